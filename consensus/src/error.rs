use thiserror::Error;

/// Structural problems with a signer record.
///
/// Everything except [`SignersError::NotValidated`],
/// [`SignersError::PowerNotAssigned`] and
/// [`SignersError::CommitteeSizeMismatch`] is reachable from untrusted wire
/// input and means the sending peer misbehaved.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash)]
pub enum SignersError {
    #[error("validator bitmap or coefficient array is oversized")]
    Oversized,

    #[error("signers information is empty")]
    Empty,

    #[error("coefficient array has incorrect length")]
    WrongCoefficientLen,

    #[error("individual signature has coefficient != 1")]
    InvalidSingleSig,

    #[error("coefficient outside allowed boundary [3, committee size]")]
    InvalidCoefficient,

    #[error("using un-validated signers information")]
    NotValidated,

    #[error("power has not been assigned in signers information")]
    PowerNotAssigned,

    #[error("comparing signers information with different committee size")]
    CommitteeSizeMismatch,
}

impl SignersError {
    /// Short, stable label for counters and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            SignersError::Oversized => "oversized",
            SignersError::Empty => "empty",
            SignersError::WrongCoefficientLen => "wrong_coefficient_len",
            SignersError::InvalidSingleSig => "invalid_single_sig",
            SignersError::InvalidCoefficient => "invalid_coefficient",
            SignersError::NotValidated => "not_validated",
            SignersError::PowerNotAssigned => "power_not_assigned",
            SignersError::CommitteeSizeMismatch => "committee_size_mismatch",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConsensusError {
    #[error("signers error: {0}")]
    Signers(#[from] SignersError),

    #[error("vote of {size} bytes exceeds the maximum of {max}")]
    Oversized { size: usize, max: usize },

    #[error("serialization error: {0}")]
    Serialization(String),
}
