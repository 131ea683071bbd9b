//! The committee of validators eligible to vote at a height.
//!
//! Members are ordered and each one keeps the zero-based index it was given at
//! construction. Signer records refer to members only by that index, so the
//! committee is the single owner of the index → address/power/key mapping and
//! is never mutated once built.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{Address, TypesError};

/// Voting power of a committee member.
pub type VotingPower = u128;

/// Committee sizes above this cannot be represented by the 16-bit overflow
/// coefficients of a signer record.
pub const MAX_COMMITTEE_SIZE: usize = u16::MAX as usize;

/// A single committee member.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitteeMember {
    pub address: Address,
    pub voting_power: VotingPower,
    /// Stable zero-based position in the committee.
    pub index: usize,
    /// Compressed BLS public key bytes.
    pub consensus_key: Vec<u8>,
}

/// An ordered, immutable validator committee.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Committee {
    members: Vec<CommitteeMember>,
    total_voting_power: VotingPower,
}

impl Committee {
    /// Build a committee from `(address, voting power, consensus key)` triples.
    ///
    /// Indices are assigned in the given order. The total power must fit in
    /// [`VotingPower`], so every sum over a subset of members is exact.
    pub fn new(
        members: impl IntoIterator<Item = (Address, VotingPower, Vec<u8>)>,
    ) -> Result<Self, TypesError> {
        let mut list = Vec::new();
        let mut seen = HashSet::new();
        let mut total: VotingPower = 0;

        for (index, (address, voting_power, consensus_key)) in members.into_iter().enumerate() {
            if voting_power == 0 {
                return Err(TypesError::ZeroVotingPower(address.to_string()));
            }
            if !seen.insert(address) {
                return Err(TypesError::DuplicateMember(address.to_string()));
            }
            total = total
                .checked_add(voting_power)
                .ok_or(TypesError::PowerOverflow)?;
            list.push(CommitteeMember {
                address,
                voting_power,
                index,
                consensus_key,
            });
        }

        if list.is_empty() {
            return Err(TypesError::EmptyCommittee);
        }
        if list.len() > MAX_COMMITTEE_SIZE {
            return Err(TypesError::CommitteeTooLarge {
                size: list.len(),
                max: MAX_COMMITTEE_SIZE,
            });
        }

        Ok(Self {
            members: list,
            total_voting_power: total,
        })
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[CommitteeMember] {
        &self.members
    }

    pub fn member_by_index(&self, index: usize) -> Option<&CommitteeMember> {
        self.members.get(index)
    }

    pub fn member_by_address(&self, address: &Address) -> Option<&CommitteeMember> {
        self.members.iter().find(|m| &m.address == address)
    }

    pub fn total_voting_power(&self) -> VotingPower {
        self.total_voting_power
    }

    /// Smallest power strictly greater than two thirds of the total.
    pub fn quorum(&self) -> VotingPower {
        self.total_voting_power / 3 * 2 + (self.total_voting_power % 3) * 2 / 3 + 1
    }

    /// Power the protocol tolerates being faulty (`total - quorum`).
    pub fn f(&self) -> VotingPower {
        self.total_voting_power - self.quorum()
    }

    /// Owned index → power mapping for the given indices.
    ///
    /// Indices outside the committee are skipped.
    pub fn powers_of(&self, indices: impl IntoIterator<Item = usize>) -> BTreeMap<usize, VotingPower> {
        indices
            .into_iter()
            .filter_map(|i| self.members.get(i).map(|m| (i, m.voting_power)))
            .collect()
    }

    /// Consensus keys for the given indices, in the same order and multiplicity.
    ///
    /// Returns `None` if any index is outside the committee.
    pub fn consensus_keys(&self, indices: &[usize]) -> Option<Vec<&[u8]>> {
        indices
            .iter()
            .map(|&i| self.members.get(i).map(|m| m.consensus_key.as_slice()))
            .collect()
    }
}
