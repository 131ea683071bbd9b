//! In-memory committee resolver.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tandem_consensus::CommitteeResolver;
use tandem_types::{Address, Committee, VotingPower};

use crate::NodeError;

/// Committees keyed by the height they sign at.
#[derive(Default)]
pub struct InMemoryCommittees {
    committees: RwLock<HashMap<u64, Arc<Committee>>>,
}

impl InMemoryCommittees {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, height: u64, committee: Committee) {
        self.committees.write().insert(height, Arc::new(committee));
    }

    /// Build a committee from `(address, power, consensus key)` triples and
    /// register it for `height`.
    pub fn insert_members(
        &self,
        height: u64,
        members: impl IntoIterator<Item = (Address, VotingPower, Vec<u8>)>,
    ) -> Result<Arc<Committee>, NodeError> {
        let committee = Arc::new(Committee::new(members)?);
        self.committees.write().insert(height, Arc::clone(&committee));
        Ok(committee)
    }

    /// Forget every committee below `height`.
    pub fn prune_below(&self, height: u64) {
        self.committees.write().retain(|&h, _| h >= height);
    }

    pub fn len(&self) -> usize {
        self.committees.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.committees.read().is_empty()
    }
}

impl CommitteeResolver for InMemoryCommittees {
    fn committee_at(&self, height: u64) -> Option<Arc<Committee>> {
        self.committees.read().get(&height).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members(n: u8) -> Vec<(Address, VotingPower, Vec<u8>)> {
        (1..=n).map(|i| (Address::new([i; 20]), 10, Vec::new())).collect()
    }

    #[test]
    fn resolves_inserted_heights() {
        let committees = InMemoryCommittees::new();
        committees.insert_members(5, members(3)).unwrap();
        assert_eq!(committees.committee_at(5).unwrap().len(), 3);
        assert!(committees.committee_at(6).is_none());
    }

    #[test]
    fn invalid_members_are_rejected() {
        let committees = InMemoryCommittees::new();
        let err = committees.insert_members(1, Vec::new()).unwrap_err();
        assert!(matches!(err, NodeError::Committee(_)));
        assert!(committees.is_empty());
    }

    #[test]
    fn prune_drops_old_heights() {
        let committees = InMemoryCommittees::new();
        for h in 1..=4 {
            committees.insert(h, Committee::new(members(2)).unwrap());
        }
        committees.prune_below(3);
        assert_eq!(committees.len(), 2);
        assert!(committees.committee_at(2).is_none());
        assert!(committees.committee_at(3).is_some());
    }
}
