//! Aggregated prevote/precommit messages.

use std::fmt;

use serde::{Deserialize, Serialize};
use tandem_crypto::{blake2b_256, blake2b_256_multi};
use tandem_types::ValueHash;

use crate::{ConsensusError, Signers};

/// Maximum encoded vote size in bytes.
///
/// Large enough for a full-size committee bitmap plus a coefficient for every
/// member.
pub const MAX_VOTE_SIZE: usize = 256 * 1024;

/// Identifies a vote message (not its content: two aggregates for the same
/// value with different signers hash differently).
pub type VoteHash = [u8; 32];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum VoteCode {
    Prevote = 0,
    Precommit = 1,
}

impl fmt::Display for VoteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteCode::Prevote => write!(f, "prevote"),
            VoteCode::Precommit => write!(f, "precommit"),
        }
    }
}

/// A (possibly aggregated) vote for `value` at `height`/`round`.
///
/// `signature` is the BLS aggregate of every signature instance that
/// `signers` accounts for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub code: VoteCode,
    pub height: u64,
    pub round: u64,
    pub value: ValueHash,
    pub signers: Signers,
    pub signature: Vec<u8>,
}

impl Vote {
    /// Digest every signer signs: code, height, round and value.
    pub fn signing_input(&self) -> [u8; 32] {
        signing_input(self.code, self.height, self.round, &self.value)
    }

    pub fn hash(&self) -> VoteHash {
        let coefficients: Vec<u8> = self
            .signers
            .coefficients()
            .iter()
            .flat_map(|c| c.to_be_bytes())
            .collect();
        blake2b_256_multi(&[
            &self.signing_input(),
            self.signers.bits().as_bytes(),
            &coefficients,
            &blake2b_256(&self.signature),
        ])
    }

    pub fn encode(&self) -> Result<Vec<u8>, ConsensusError> {
        let bytes =
            bincode::serialize(self).map_err(|e| ConsensusError::Serialization(e.to_string()))?;
        if bytes.len() > MAX_VOTE_SIZE {
            return Err(ConsensusError::Oversized {
                size: bytes.len(),
                max: MAX_VOTE_SIZE,
            });
        }
        Ok(bytes)
    }

    /// Decode a vote from the wire. The signer record comes back in the
    /// decoded state and must be prepared before use.
    pub fn decode(bytes: &[u8]) -> Result<Self, ConsensusError> {
        if bytes.len() > MAX_VOTE_SIZE {
            return Err(ConsensusError::Oversized {
                size: bytes.len(),
                max: MAX_VOTE_SIZE,
            });
        }
        bincode::deserialize(bytes).map_err(|e| ConsensusError::Serialization(e.to_string()))
    }
}

/// Signing input for a vote that has not been built yet.
pub fn signing_input(code: VoteCode, height: u64, round: u64, value: &ValueHash) -> [u8; 32] {
    blake2b_256_multi(&[
        &[code as u8],
        &height.to_be_bytes(),
        &round.to_be_bytes(),
        value.as_bytes(),
    ])
}
