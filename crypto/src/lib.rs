//! Cryptographic primitives for Tandem.
//!
//! - **Blake2b-256** for vote signing input and message identifiers
//! - **BLS12-381** (`blst`, min-pk variant) for verifying aggregated vote
//!   signatures against the keys of every signature instance folded into
//!   the aggregate

pub mod bls;
pub mod error;
pub mod hash;

pub use bls::{
    aggregate_signatures, public_key_bytes, secret_key_from_seed, sign, AggregateVerifier,
    BlsAggregateVerifier, POP_DST,
};
pub use blst::min_pk::SecretKey as BlsSecretKey;
pub use error::CryptoError;
pub use hash::{blake2b_256, blake2b_256_multi};
