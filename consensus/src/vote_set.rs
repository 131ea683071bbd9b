//! Votes of one kind (prevote or precommit) for one round, grouped by value.
//!
//! Each committee index is counted at most once across the whole set: power
//! for a value is tallied with an [`AggregatedPower`] per value plus one for
//! the set as a whole, and an index that shows up for a second value is
//! reported as equivocation instead of being counted again.
//!
//! All queries take the read lock and hand back owned copies.

use std::collections::HashMap;

use parking_lot::RwLock;
use tandem_types::ValueHash;
use tracing::{debug, warn};

use crate::aggregated_power::contribution;
use crate::{AggregatedPower, Signers, SignersError, Vote};

/// The result of adding a vote to a [`VoteSet`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VoteResult {
    /// At least one signer was new for the value; its power was counted.
    Accepted,
    /// Every signer was already counted for the value. The vote was dropped.
    Duplicate,
    /// These signers were already counted for a different value. The vote
    /// was dropped without counting any of its power.
    Equivocation { indices: Vec<usize> },
}

#[derive(Default)]
struct VoteSetInner {
    votes: HashMap<ValueHash, Vec<Vote>>,
    power_for: HashMap<ValueHash, AggregatedPower>,
    aggregates: HashMap<ValueHash, Signers>,
    total: AggregatedPower,
    /// committee index → value its power was counted for
    counted: HashMap<usize, ValueHash>,
    /// Committee size of the first vote added.
    committee_size: Option<usize>,
}

#[derive(Default)]
pub struct VoteSet {
    inner: RwLock<VoteSetInner>,
}

impl VoteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vote whose signer record is power-assigned.
    ///
    /// # Panics
    ///
    /// Panics if `vote.signers` has no power assigned, or if its committee
    /// size differs from that of the votes already in the set.
    pub fn add(&self, vote: Vote) -> VoteResult {
        let mut inner = self.inner.write();
        let size = vote.signers.committee_size();
        assert!(
            *inner.committee_size.get_or_insert(size) == size,
            "{}",
            SignersError::CommitteeSizeMismatch
        );

        let equivocating: Vec<usize> = vote
            .signers
            .flatten_uniq()
            .into_iter()
            .filter(|i| matches!(inner.counted.get(i), Some(v) if *v != vote.value))
            .collect();
        if !equivocating.is_empty() {
            warn!(
                code = %vote.code,
                height = vote.height,
                round = vote.round,
                value = %vote.value,
                indices = ?equivocating,
                "equivocating signers in vote"
            );
            return VoteResult::Equivocation {
                indices: equivocating,
            };
        }

        let incoming = AggregatedPower::from_signers(&vote.signers);
        let adds_power = match inner.power_for.get(&vote.value) {
            Some(core) => contribution(incoming.signers(), core.signers()).any(),
            None => !incoming.is_empty(),
        };
        if !adds_power {
            debug!(
                code = %vote.code,
                round = vote.round,
                value = %vote.value,
                "vote adds no new power"
            );
            return VoteResult::Duplicate;
        }

        let core = inner.power_for.entry(vote.value).or_default();
        for (&index, &power) in vote.signers.powers() {
            core.set(index, power);
        }
        let value_power = core.power();

        let inner = &mut *inner;
        for (&index, &power) in vote.signers.powers() {
            inner.total.set(index, power);
            inner.counted.insert(index, vote.value);
        }

        match inner.aggregates.get_mut(&vote.value) {
            None => {
                inner.aggregates.insert(vote.value, vote.signers.clone());
            }
            Some(aggregate) => {
                if aggregate.respects_boundaries(&vote.signers) {
                    if let Err(e) = aggregate.merge(&vote.signers) {
                        panic!("{e}");
                    }
                }
            }
        }

        debug!(
            code = %vote.code,
            round = vote.round,
            value = %vote.value,
            signers = vote.signers.len(),
            power = %value_power,
            "vote accepted"
        );
        inner.votes.entry(vote.value).or_default().push(vote);
        VoteResult::Accepted
    }

    /// Power counted for `value` so far.
    pub fn power_for(&self, value: &ValueHash) -> AggregatedPower {
        self.inner
            .read()
            .power_for
            .get(value)
            .cloned()
            .unwrap_or_default()
    }

    /// Power counted across all values.
    pub fn total_power(&self) -> AggregatedPower {
        self.inner.read().total.clone()
    }

    /// Every accepted vote, grouped by value.
    pub fn messages(&self) -> Vec<Vote> {
        self.inner.read().votes.values().flatten().cloned().collect()
    }

    pub fn votes_for(&self, value: &ValueHash) -> Vec<Vote> {
        self.inner
            .read()
            .votes
            .get(value)
            .cloned()
            .unwrap_or_default()
    }

    /// Values with at least one accepted vote.
    pub fn values(&self) -> Vec<ValueHash> {
        self.inner.read().votes.keys().copied().collect()
    }

    /// Merged signer record of the accepted votes for `value`.
    ///
    /// Votes whose merge would push a signer's count past the committee size
    /// are counted for power but left out of the aggregate.
    pub fn aggregate_for(&self, value: &ValueHash) -> Option<Signers> {
        self.inner.read().aggregates.get(value).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().votes.is_empty()
    }

    /// Committee size the set is bound to, once a vote has been added.
    pub fn committee_size(&self) -> Option<usize> {
        self.inner.read().committee_size
    }
}
