//! Per-round vote ledger: prevotes and precommits of each round at one height.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tandem_types::{Committee, ValueHash};

use crate::{AggregatedPower, Vote, VoteCode, VoteResult, VoteSet};

/// Messages received for a single round.
#[derive(Default)]
pub struct RoundMessages {
    prevotes: VoteSet,
    precommits: VoteSet,
    /// Power of every signer seen in the round, whatever the vote kind.
    power: RwLock<AggregatedPower>,
}

impl RoundMessages {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Panics
    ///
    /// Panics if `vote.signers` has no power assigned.
    pub fn add(&self, vote: Vote) -> VoteResult {
        let powers = vote.signers.powers().clone();
        let result = self.votes(vote.code).add(vote);
        if result == VoteResult::Accepted {
            let mut power = self.power.write();
            for (index, p) in powers {
                power.set(index, p);
            }
        }
        result
    }

    pub fn votes(&self, code: VoteCode) -> &VoteSet {
        match code {
            VoteCode::Prevote => &self.prevotes,
            VoteCode::Precommit => &self.precommits,
        }
    }

    pub fn prevotes(&self) -> &VoteSet {
        &self.prevotes
    }

    pub fn precommits(&self) -> &VoteSet {
        &self.precommits
    }

    /// Power of every signer that voted in this round.
    pub fn power(&self) -> AggregatedPower {
        self.power.read().clone()
    }

    pub fn all_messages(&self) -> Vec<Vote> {
        let mut messages = self.prevotes.messages();
        messages.extend(self.precommits.messages());
        messages
    }

    /// Whether `value` has more than two thirds of the committee's power.
    pub fn has_quorum_for(&self, code: VoteCode, value: &ValueHash, committee: &Committee) -> bool {
        self.votes(code).power_for(value).power() >= committee.quorum()
    }

    /// Whether votes of this kind, for any values, carry more than two thirds
    /// of the committee's power.
    pub fn has_quorum_any(&self, code: VoteCode, committee: &Committee) -> bool {
        self.votes(code).total_power().power() >= committee.quorum()
    }

    /// Whether more power than the committee tolerates being faulty has been
    /// seen in this round, i.e. at least one honest member has moved on to it.
    pub fn exceeds_faulty_power(&self, committee: &Committee) -> bool {
        self.power.read().power() > committee.f()
    }
}

/// Round number → messages of that round.
#[derive(Default)]
pub struct RoundMessagesMap {
    rounds: RwLock<BTreeMap<u64, Arc<RoundMessages>>>,
}

impl RoundMessagesMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create(&self, round: u64) -> Arc<RoundMessages> {
        if let Some(messages) = self.rounds.read().get(&round) {
            return Arc::clone(messages);
        }
        Arc::clone(self.rounds.write().entry(round).or_default())
    }

    pub fn get(&self, round: u64) -> Option<Arc<RoundMessages>> {
        self.rounds.read().get(&round).cloned()
    }

    /// Rounds with messages, ascending.
    pub fn rounds(&self) -> Vec<u64> {
        self.rounds.read().keys().copied().collect()
    }

    /// Every message of every round.
    pub fn all(&self) -> Vec<Vote> {
        self.rounds
            .read()
            .values()
            .flat_map(|r| r.all_messages())
            .collect()
    }

    pub fn reset(&self) {
        self.rounds.write().clear();
    }
}
