#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use tandem_consensus::{AggregatedPower, Signers};
use tandem_types::{Address, Committee};

const COMMITTEE_SIZE: usize = 12;

#[derive(Debug, Arbitrary)]
struct Input {
    /// Increments of each record, as committee indices (taken modulo size).
    records: Vec<Vec<u8>>,
}

// Build records by increments, merge them whenever the boundary check allows
// it, and check power is always the sum over distinct signers.
fuzz_target!(|input: Input| {
    let committee = Committee::new(
        (0..COMMITTEE_SIZE).map(|i| (Address::new([i as u8; 20]), 1u128 << i, Vec::new())),
    )
    .expect("generated committee is valid");

    let mut aggregate = Signers::new(COMMITTEE_SIZE);
    let mut expected = AggregatedPower::new();

    for increments in input.records.iter().take(16) {
        let mut record = Signers::new(COMMITTEE_SIZE);
        let mut counts = [0usize; COMMITTEE_SIZE];
        for &i in increments.iter().take(64) {
            let index = usize::from(i) % COMMITTEE_SIZE;
            if counts[index] == COMMITTEE_SIZE {
                continue;
            }
            counts[index] += 1;
            record.increment(&committee.members()[index]);
        }

        if !aggregate.respects_boundaries(&record) {
            continue;
        }
        let before = aggregate.flatten().len();
        aggregate.merge(&record).expect("records share a committee");
        assert_eq!(aggregate.flatten().len(), before + record.flatten().len());

        for (&index, &power) in record.powers() {
            expected.set(index, power);
        }
        assert_eq!(aggregate.power(), expected.power());
        assert_eq!(aggregate.len(), expected.len());
    }
});
