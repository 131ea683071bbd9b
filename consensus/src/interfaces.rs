//! Collaborators the ledger consumes but does not implement.

use std::sync::Arc;

use tandem_types::Committee;

pub use tandem_crypto::AggregateVerifier;

/// Looks up the committee that signs votes at a given height.
pub trait CommitteeResolver: Send + Sync {
    /// `None` if the committee for `height` is not known (yet).
    fn committee_at(&self, height: u64) -> Option<Arc<Committee>>;
}
