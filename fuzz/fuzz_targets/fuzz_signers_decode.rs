#![no_main]

use libfuzzer_sys::fuzz_target;

use tandem_consensus::{Signers, Vote};
use tandem_types::{Address, Committee};

// Decode arbitrary bytes as a signer record and as a full vote, then run
// validation and everything a validated record allows.
// None of it may panic on malformed input.
fuzz_target!(|data: &[u8]| {
    let Some((&size, rest)) = data.split_first() else {
        return;
    };
    let committee_size = usize::from(size).max(1);
    let committee = Committee::new(
        (0..committee_size).map(|i| (Address::new([i as u8; 20]), i as u128 + 1, Vec::new())),
    )
    .expect("generated committee is valid");

    if let Ok(mut signers) = bincode::deserialize::<Signers>(rest) {
        if let Ok(length) = signers.prepare(&committee) {
            assert_eq!(signers.flatten_uniq().len(), length);
            assert!(signers.flatten().len() >= length);
            assert!(signers.power() <= committee.total_voting_power());
        }
    }

    if let Ok(mut vote) = Vote::decode(rest) {
        let _ = vote.signers.prepare(&committee);
    }
});
