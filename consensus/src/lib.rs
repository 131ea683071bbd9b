//! Consensus: aggregate-signer accounting for BLS-aggregated votes.
//!
//! Votes carry one BLS signature that may fold together signatures from many
//! committee members, some of them more than once. This crate tracks who
//! signed and how often, and tallies voting power so that no member is ever
//! counted twice, whatever order partial aggregates arrive in.
//!
//! ## Module overview
//!
//! - [`bitmap`]: Packed 2-bit per-validator signature counters.
//! - [`signers`]: Signer record, i.e. counters plus overflow coefficients, with
//!   validate / increment / merge / flatten.
//! - [`aggregated_power`]: One-bit-per-member power accumulator and the
//!   contribution operator.
//! - [`vote`]: Prevote/precommit messages and their wire encoding.
//! - [`vote_set`]: Votes of one kind for a round, with equivocation and
//!   duplicate detection.
//! - [`round_messages`]: Per-round ledger and quorum checks.
//! - [`interfaces`]: Committee resolution and signature verification seams.
//! - [`error`]: Consensus error types.

pub mod aggregated_power;
pub mod bitmap;
pub mod error;
pub mod interfaces;
pub mod round_messages;
pub mod signers;
pub mod vote;
pub mod vote_set;

pub use aggregated_power::{contribution, AggregatedPower};
pub use bitmap::ValidatorBitmap;
pub use error::{ConsensusError, SignersError};
pub use interfaces::{AggregateVerifier, CommitteeResolver};
pub use round_messages::{RoundMessages, RoundMessagesMap};
pub use signers::Signers;
pub use vote::{signing_input, Vote, VoteCode, VoteHash, MAX_VOTE_SIZE};
pub use vote_set::{VoteResult, VoteSet};
