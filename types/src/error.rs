//! Errors raised while building shared types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("committee has no members")]
    EmptyCommittee,

    #[error("committee of {size} members exceeds the supported maximum of {max}")]
    CommitteeTooLarge { size: usize, max: usize },

    #[error("committee member {0} has zero voting power")]
    ZeroVotingPower(String),

    #[error("address {0} appears more than once in the committee")]
    DuplicateMember(String),

    #[error("total voting power of the committee overflows")]
    PowerOverflow,
}
