//! Vote ingestion: the path from untrusted wire bytes to the round ledger.
//!
//! ```text
//! bytes ─decode─▶ Vote ─committee_at(height)─▶ prepare(committee)
//!       ─verify(keys of flatten(), signing_input)─▶ RoundMessagesMap[height][round]
//! ```
//!
//! Anything a peer can get wrong is reported as [`IngestOutcome::Rejected`],
//! logged, counted per reason and charged to the peer as a strike. Nothing
//! on this path panics on remote input.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tandem_consensus::{
    AggregateVerifier, CommitteeResolver, RoundMessagesMap, SignersError, Vote, VoteResult,
};
use tandem_utils::StatsCounter;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{NodeConfig, PeerScores};

/// Why an inbound vote was not added to the ledger.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum RejectReason {
    #[error("vote could not be decoded")]
    Decode,

    #[error("no committee known for the vote's height")]
    UnknownCommittee,

    #[error("vote is for a height that is no longer retained")]
    StaleHeight,

    #[error("invalid signers: {0}")]
    Signers(SignersError),

    #[error("aggregate signature does not verify")]
    InvalidSignature,
}

impl RejectReason {
    /// Every label [`RejectReason::kind`] can return.
    pub const KINDS: [&'static str; 12] = [
        "decode",
        "unknown_committee",
        "stale_height",
        "oversized",
        "empty",
        "wrong_coefficient_len",
        "invalid_single_sig",
        "invalid_coefficient",
        "not_validated",
        "power_not_assigned",
        "committee_size_mismatch",
        "invalid_signature",
    ];

    pub fn kind(&self) -> &'static str {
        match self {
            RejectReason::Decode => "decode",
            RejectReason::UnknownCommittee => "unknown_committee",
            RejectReason::StaleHeight => "stale_height",
            RejectReason::Signers(e) => e.kind(),
            RejectReason::InvalidSignature => "invalid_signature",
        }
    }

    /// Whether the sending peer is to blame.
    ///
    /// A vote for a height we have no committee for (or no longer track) may
    /// just be early or late. A committee size that no longer matches the
    /// round's earlier votes means the committee was replaced locally.
    pub fn is_peer_fault(&self) -> bool {
        !matches!(
            self,
            RejectReason::UnknownCommittee
                | RejectReason::StaleHeight
                | RejectReason::Signers(SignersError::CommitteeSizeMismatch)
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IngestOutcome {
    Added(VoteResult),
    Rejected(RejectReason),
}

pub struct VoteIngestor {
    committees: Arc<dyn CommitteeResolver>,
    verifier: Arc<dyn AggregateVerifier>,
    heights: RwLock<BTreeMap<u64, Arc<RoundMessagesMap>>>,
    retained_heights: usize,
    peers: PeerScores,
    rejections: StatsCounter,
}

impl VoteIngestor {
    pub fn new(
        config: &NodeConfig,
        committees: Arc<dyn CommitteeResolver>,
        verifier: Arc<dyn AggregateVerifier>,
    ) -> Self {
        Self {
            committees,
            verifier,
            heights: RwLock::new(BTreeMap::new()),
            retained_heights: config.retained_heights.max(1),
            peers: PeerScores::new(config.max_peer_strikes),
            rejections: StatsCounter::new(&RejectReason::KINDS),
        }
    }

    /// Decode, check and record a vote received from `peer`.
    pub fn ingest(&self, peer: &str, bytes: &[u8]) -> IngestOutcome {
        match self.try_ingest(bytes) {
            Ok(result) => IngestOutcome::Added(result),
            Err(reason) => {
                self.reject(peer, reason);
                IngestOutcome::Rejected(reason)
            }
        }
    }

    fn try_ingest(&self, bytes: &[u8]) -> Result<VoteResult, RejectReason> {
        let mut vote = Vote::decode(bytes).map_err(|e| {
            debug!(error = %e, len = bytes.len(), "undecodable vote");
            RejectReason::Decode
        })?;

        if self.is_stale(vote.height) {
            return Err(RejectReason::StaleHeight);
        }
        let committee = self
            .committees
            .committee_at(vote.height)
            .ok_or(RejectReason::UnknownCommittee)?;

        vote.signers
            .prepare(&committee)
            .map_err(RejectReason::Signers)?;

        let indices = vote.signers.flatten();
        let keys = committee
            .consensus_keys(&indices)
            .ok_or(RejectReason::InvalidSignature)?;
        match self
            .verifier
            .verify(&keys, &vote.signature, &vote.signing_input())
        {
            Ok(true) => {}
            Ok(false) => return Err(RejectReason::InvalidSignature),
            Err(e) => {
                debug!(error = %e, "signature verification failed");
                return Err(RejectReason::InvalidSignature);
            }
        }

        let hash = vote.hash();
        debug!(
            vote = %hex::encode(&hash[..8]),
            code = %vote.code,
            height = vote.height,
            round = vote.round,
            signers = vote.signers.len(),
            "vote verified"
        );
        let round = self.messages_for(vote.height).get_or_create(vote.round);
        if round
            .votes(vote.code)
            .committee_size()
            .is_some_and(|size| size != committee.len())
        {
            return Err(RejectReason::Signers(SignersError::CommitteeSizeMismatch));
        }
        Ok(round.add(vote))
    }

    fn reject(&self, peer: &str, reason: RejectReason) {
        self.rejections.increment(reason.kind());
        if !reason.is_peer_fault() {
            debug!(peer, reason = reason.kind(), "vote not ingested");
            return;
        }
        let strikes = self.peers.strike(peer);
        warn!(
            peer,
            reason = reason.kind(),
            error = %reason,
            strikes,
            "rejected vote from peer"
        );
    }

    fn is_stale(&self, height: u64) -> bool {
        let heights = self.heights.read();
        heights.len() >= self.retained_heights
            && heights.keys().next().is_some_and(|&lowest| height < lowest)
    }

    /// Round messages for `height`, dropping the oldest heights beyond the
    /// retention limit.
    fn messages_for(&self, height: u64) -> Arc<RoundMessagesMap> {
        let mut heights = self.heights.write();
        let rounds = Arc::clone(heights.entry(height).or_default());
        while heights.len() > self.retained_heights {
            if let Some((dropped, _)) = heights.pop_first() {
                debug!(height = dropped, "dropped round messages");
            }
        }
        rounds
    }

    /// Round messages recorded for `height`, if still retained.
    pub fn messages_at(&self, height: u64) -> Option<Arc<RoundMessagesMap>> {
        self.heights.read().get(&height).cloned()
    }

    /// Heights with retained round messages, ascending.
    pub fn heights(&self) -> Vec<u64> {
        self.heights.read().keys().copied().collect()
    }

    pub fn should_disconnect(&self, peer: &str) -> bool {
        self.peers.should_disconnect(peer)
    }

    pub fn peers(&self) -> &PeerScores {
        &self.peers
    }

    /// Rejections counted per [`RejectReason::kind`].
    pub fn rejections(&self) -> &StatsCounter {
        &self.rejections
    }
}
