//! Hash identifying a proposed value (block) that validators vote on.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte hash of a proposed value.
///
/// The all-zero hash is the *nil* value: a vote for nil means the validator
/// did not see a valid proposal in time.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ValueHash([u8; 32]);

impl Default for ValueHash {
    fn default() -> Self {
        Self::NIL
    }
}

impl ValueHash {
    pub const NIL: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_nil(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Debug for ValueHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nil() {
            return write!(f, "ValueHash(nil)");
        }
        write!(f, "ValueHash(")?;
        for b in &self.0[..4] {
            write!(f, "{:02x}", b)?;
        }
        write!(f, "\u{2026})")
    }
}

impl fmt::Display for ValueHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}
