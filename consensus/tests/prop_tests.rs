use proptest::prelude::*;

use tandem_consensus::{Signers, ValidatorBitmap, Vote, VoteCode, VoteResult, VoteSet};
use tandem_types::{Address, Committee, ValueHash, VotingPower};

const POWERS: [VotingPower; 8] = [10, 20, 15, 5, 30, 1, 7, 12];

fn committee() -> Committee {
    Committee::new(
        POWERS
            .iter()
            .enumerate()
            .map(|(i, &p)| (Address::new([i as u8 + 1; 20]), p, Vec::new())),
    )
    .unwrap()
}

fn record(c: &Committee, increments: &[usize]) -> Signers {
    let mut s = Signers::new(c.len());
    for &i in increments {
        s.increment(c.member_by_index(i).unwrap());
    }
    s
}

/// Sorted increment sequences with at most `max` signatures per index.
fn increments_up_to(max: usize) -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec((0..POWERS.len(), 1..=max), 0..POWERS.len()).prop_map(|pairs| {
        let mut seen = std::collections::BTreeMap::new();
        for (index, count) in pairs {
            seen.entry(index).or_insert(count);
        }
        seen.into_iter()
            .flat_map(|(index, count)| std::iter::repeat(index).take(count))
            .collect()
    })
}

/// Any three of these merge within the committee-size bound.
fn increments() -> impl Strategy<Value = Vec<usize>> {
    increments_up_to(2)
}

fn distinct_power(parts: &[&[usize]]) -> VotingPower {
    let mut indices: Vec<usize> = parts.iter().flat_map(|p| p.iter().copied()).collect();
    indices.sort_unstable();
    indices.dedup();
    indices.iter().map(|&i| POWERS[i]).sum()
}

fn sorted_flatten(s: &Signers) -> Vec<usize> {
    let mut f = s.flatten();
    f.sort_unstable();
    f
}

proptest! {
    /// Merge order never changes the resulting record.
    #[test]
    fn merge_is_commutative_and_associative(
        a in increments(),
        b in increments(),
        d in increments(),
    ) {
        let c = committee();
        let (ra, rb, rd) = (record(&c, &a), record(&c, &b), record(&c, &d));

        let mut left = ra.clone();
        left.merge(&rb).unwrap();
        left.merge(&rd).unwrap();

        let mut inner = rb.clone();
        inner.merge(&rd).unwrap();
        let mut right = ra.clone();
        right.merge(&inner).unwrap();

        let mut reversed = rd.clone();
        reversed.merge(&rb).unwrap();
        reversed.merge(&ra).unwrap();

        let all: Vec<usize> = a.iter().chain(&b).chain(&d).copied().collect();
        let incremented = record(&c, &all);

        prop_assert_eq!(&left, &right);
        prop_assert_eq!(&left, &reversed);
        prop_assert_eq!(&left, &incremented);
        prop_assert_eq!(sorted_flatten(&left), sorted_flatten(&incremented));
    }

    /// Power counts each distinct signer once, however often it signed.
    #[test]
    fn merge_never_double_counts(a in increments(), b in increments()) {
        let c = committee();
        let mut merged = record(&c, &a);
        merged.merge(&record(&c, &b)).unwrap();

        prop_assert_eq!(merged.power(), distinct_power(&[a.as_slice(), b.as_slice()]));
        let total: VotingPower = merged.powers().values().sum();
        prop_assert_eq!(merged.power(), total);
    }

    /// `flatten` has one entry per signature, `flatten_uniq` one per signer.
    #[test]
    fn flatten_cardinality(a in increments()) {
        let c = committee();
        let s = record(&c, &a);
        prop_assert_eq!(s.flatten().len(), a.len());
        prop_assert_eq!(s.flatten_uniq().len(), s.len());
        prop_assert_eq!(sorted_flatten(&s), a);
    }

    /// Wire round-trip keeps bits and coefficients and rebuilds derived state.
    #[test]
    fn wire_roundtrip_rebuilds_record(a in increments_up_to(5)) {
        prop_assume!(!a.is_empty());
        // A lone signer must sign exactly once to pass validation.
        let mut uniq = a.clone();
        uniq.dedup();
        prop_assume!(uniq.len() > 1 || a.len() == 1);

        let c = committee();
        let original = record(&c, &a);
        let bytes = bincode::serialize(&original).unwrap();
        let mut decoded: Signers = bincode::deserialize(&bytes).unwrap();
        prop_assert!(!decoded.is_validated());

        prop_assert_eq!(decoded.validate(c.len()), Ok(original.len()));
        decoded.assign_power(&c).unwrap();
        prop_assert_eq!(decoded.bits(), original.bits());
        prop_assert_eq!(decoded.coefficients(), original.coefficients());
        prop_assert_eq!(decoded.power(), original.power());
        prop_assert_eq!(decoded.flatten(), original.flatten());
    }

    /// Validation never panics on arbitrary wire data.
    #[test]
    fn validate_handles_arbitrary_input(
        bytes in prop::collection::vec(any::<u8>(), 0..6),
        coefficients in prop::collection::vec(any::<u16>(), 0..6),
        size in 1usize..20,
    ) {
        let mut s = Signers::from_parts(ValidatorBitmap::from_bytes(bytes), coefficients);
        if let Ok(length) = s.validate(size) {
            prop_assert_eq!(s.flatten_uniq().len(), length);
            prop_assert!(s.flatten().len() >= length);
        }
    }

    /// The ledger's power for a value is independent of arrival order.
    #[test]
    fn vote_set_power_is_order_independent(
        votes in prop::collection::vec(increments(), 1..6),
    ) {
        let c = committee();
        let build = |increments: &Vec<usize>| Vote {
            code: VoteCode::Prevote,
            height: 1,
            round: 0,
            value: ValueHash::new([1; 32]),
            signers: record(&c, increments),
            signature: Vec::new(),
        };

        let forward = VoteSet::new();
        for v in &votes {
            let equivocated = matches!(forward.add(build(v)), VoteResult::Equivocation { .. });
            prop_assert!(!equivocated);
        }
        let backward = VoteSet::new();
        for v in votes.iter().rev() {
            backward.add(build(v));
        }

        let parts: Vec<&[usize]> = votes.iter().map(|v| v.as_slice()).collect();
        let value = ValueHash::new([1; 32]);
        prop_assert_eq!(forward.power_for(&value).power(), distinct_power(&parts));
        prop_assert_eq!(backward.power_for(&value).power(), distinct_power(&parts));
    }
}
