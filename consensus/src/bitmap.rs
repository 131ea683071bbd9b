//! Packed array of 2-bit per-validator counters.
//!
//! Four counters per byte, most significant pair first:
//!
//! ```text
//! index    0  1  2  3 | 4  5  ...
//! bits     00 11 10 01 | 00 11 ...
//! ```
//!
//! A counter of `3` is a sentinel; the true count lives in the signer
//! record's coefficient list.

use serde::{Deserialize, Serialize};

const BITS_PER_VALIDATOR: usize = 2;
const VALIDATORS_PER_BYTE: usize = 8 / BITS_PER_VALIDATOR;

/// Largest value a counter can hold.
pub const SENTINEL: u8 = 3;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidatorBitmap(Vec<u8>);

impl ValidatorBitmap {
    /// Zeroed bitmap for `committee_size` validators.
    pub fn new(committee_size: usize) -> Self {
        Self(vec![0u8; Self::byte_len(committee_size)])
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of bytes needed for `committee_size` counters.
    pub fn byte_len(committee_size: usize) -> usize {
        (committee_size * BITS_PER_VALIDATOR).div_ceil(8)
    }

    /// Whether the buffer has exactly the length `committee_size` requires.
    pub fn valid(&self, committee_size: usize) -> bool {
        self.0.len() == Self::byte_len(committee_size)
    }

    /// Whether the unused counter slots after `committee_size` in the last
    /// byte are all zero.
    pub fn padding_is_clear(&self, committee_size: usize) -> bool {
        let used = committee_size % VALIDATORS_PER_BYTE;
        if used == 0 {
            return true;
        }
        let padding = (1u8 << ((VALIDATORS_PER_BYTE - used) * BITS_PER_VALIDATOR)) - 1;
        self.0.last().map_or(true, |&last| last & padding == 0)
    }

    /// # Panics
    ///
    /// Panics if `index` falls outside the buffer.
    pub fn get(&self, index: usize) -> u8 {
        let byte = self.0[index / VALIDATORS_PER_BYTE];
        (byte >> Self::shift(index)) & SENTINEL
    }

    /// # Panics
    ///
    /// Panics if `value` does not fit in two bits or `index` falls outside
    /// the buffer.
    pub fn set(&mut self, index: usize, value: u8) {
        assert!(value <= SENTINEL, "value {value} cannot fit into 2 bits");
        let shift = Self::shift(index);
        let byte = &mut self.0[index / VALIDATORS_PER_BYTE];
        *byte = (*byte & !(SENTINEL << shift)) | (value << shift);
    }

    fn shift(index: usize) -> usize {
        (VALIDATORS_PER_BYTE - 1 - index % VALIDATORS_PER_BYTE) * BITS_PER_VALIDATOR
    }
}
