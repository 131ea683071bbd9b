use proptest::prelude::*;

use tandem_types::{Address, Committee, ValueHash};

proptest! {
    /// ValueHash::is_nil is true only for all-zero bytes.
    #[test]
    fn value_hash_is_nil_correct(bytes in prop::array::uniform32(0u8..)) {
        let hash = ValueHash::new(bytes);
        prop_assert_eq!(hash.is_nil(), bytes == [0u8; 32]);
    }

    /// ValueHash bincode serialization roundtrip.
    #[test]
    fn value_hash_bincode_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let hash = ValueHash::new(bytes);
        let encoded = bincode::serialize(&hash).unwrap();
        let decoded: ValueHash = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, hash);
    }

    /// Quorum is the smallest power strictly above two thirds of the total.
    #[test]
    fn quorum_is_minimal_supermajority(powers in prop::collection::vec(1u128..1_000_000, 1..64)) {
        let committee = Committee::new(
            powers
                .iter()
                .enumerate()
                .map(|(i, &p)| (Address::new([(i as u8).wrapping_add(1); 20]), p, Vec::new())),
        )
        .unwrap();
        let total: u128 = powers.iter().sum();
        let q = committee.quorum();
        prop_assert_eq!(committee.total_voting_power(), total);
        prop_assert!(q * 3 > total * 2);
        prop_assert!((q - 1) * 3 <= total * 2);
    }

    /// Committee bincode roundtrip keeps member order and address lookups.
    #[test]
    fn committee_bincode_roundtrip(powers in prop::collection::vec(1u128..1_000, 1..32)) {
        let committee = Committee::new(
            powers
                .iter()
                .enumerate()
                .map(|(i, &p)| (Address::new([i as u8; 20]), p, vec![i as u8; 4])),
        )
        .unwrap();
        let encoded = bincode::serialize(&committee).unwrap();
        let decoded: Committee = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded.len(), committee.len());
        prop_assert_eq!(decoded.total_voting_power(), committee.total_voting_power());
        for member in committee.members() {
            let found = decoded.member_by_address(&member.address).unwrap();
            prop_assert_eq!(found.index, member.index);
        }
    }
}
