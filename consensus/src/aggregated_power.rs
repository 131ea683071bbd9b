//! Simple power accumulator: one bit per committee member.
//!
//! Unlike [`Signers`](crate::Signers) there are no repeat counts, so setting
//! the same index twice never adds its power twice. Used to tally power for a
//! value as votes are added once each.

use bitvec::slice::BitSlice;
use bitvec::vec::BitVec;
use tandem_types::VotingPower;

use crate::Signers;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AggregatedPower {
    power: VotingPower,
    signers: BitVec,
}

impl AggregatedPower {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulator holding every signer of a power-assigned record.
    ///
    /// # Panics
    ///
    /// Panics if `signers` has no power assigned.
    pub fn from_signers(signers: &Signers) -> Self {
        let mut acc = Self::new();
        for (&index, &power) in signers.powers() {
            acc.set(index, power);
        }
        acc
    }

    /// Mark `index` as a signer, adding `power` only if it was not set before.
    ///
    /// Powers come from one committee, whose total fits in [`VotingPower`].
    pub fn set(&mut self, index: usize, power: VotingPower) {
        if index >= self.signers.len() {
            self.signers.resize(index + 1, false);
        }
        if !self.signers[index] {
            self.signers.set(index, true);
            self.power += power;
        }
    }

    pub fn power(&self) -> VotingPower {
        self.power
    }

    pub fn signers(&self) -> &BitSlice {
        &self.signers
    }

    pub fn contains(&self, index: usize) -> bool {
        index < self.signers.len() && self.signers[index]
    }

    /// Number of distinct signers.
    pub fn len(&self) -> usize {
        self.signers.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.signers.not_any()
    }
}

/// Signers in `aggregator` that are not yet in `core`.
///
/// An empty result means the aggregate adds no new power and can be dropped
/// without merging.
pub fn contribution(aggregator: &BitSlice, core: &BitSlice) -> BitVec {
    let mut result = aggregator.to_bitvec();
    for index in core.iter_ones() {
        if index >= result.len() {
            break;
        }
        result.set(index, false);
    }
    result
}
