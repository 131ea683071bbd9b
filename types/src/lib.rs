//! Fundamental types for the Tandem validator.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! validator addresses, proposed-value hashes, voting power, and the committee
//! that votes at a given height.

pub mod address;
pub mod committee;
pub mod error;
pub mod hash;

pub use address::Address;
pub use committee::{Committee, CommitteeMember, VotingPower, MAX_COMMITTEE_SIZE};
pub use error::TypesError;
pub use hash::ValueHash;
