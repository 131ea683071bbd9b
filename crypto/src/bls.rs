//! BLS12-381 aggregate signature verification.
//!
//! Uses the min-pk variant: public keys live in G1 (48 bytes compressed),
//! signatures in G2 (96 bytes compressed). An aggregated vote carries one
//! signature that folds together every individual signature it was built
//! from, so the aggregate public key must include a signer's key once per
//! signature instance, not once per signer.

use blst::min_pk::{AggregatePublicKey, AggregateSignature, PublicKey, SecretKey, Signature};
use blst::BLST_ERROR;

use crate::CryptoError;

/// Domain separation tag for the proof-of-possession ciphersuite.
pub const POP_DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_";

/// Verifies an aggregated signature against the keys of its signers.
///
/// `keys` holds one entry per signature instance, so a key may repeat.
pub trait AggregateVerifier: Send + Sync {
    fn verify(&self, keys: &[&[u8]], signature: &[u8], message: &[u8]) -> Result<bool, CryptoError>;
}

/// [`AggregateVerifier`] backed by `blst`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlsAggregateVerifier;

impl AggregateVerifier for BlsAggregateVerifier {
    fn verify(&self, keys: &[&[u8]], signature: &[u8], message: &[u8]) -> Result<bool, CryptoError> {
        if keys.is_empty() {
            return Err(CryptoError::EmptyKeySet);
        }

        let public_keys = keys
            .iter()
            .map(|bytes| {
                PublicKey::from_bytes(bytes)
                    .map_err(|e| CryptoError::InvalidPublicKey(format!("G1 point deserialization: {e:?}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let refs: Vec<&PublicKey> = public_keys.iter().collect();

        let aggregate = AggregatePublicKey::aggregate(&refs, true)
            .map_err(|e| CryptoError::Aggregation(format!("{e:?}")))?
            .to_public_key();

        let sig = Signature::from_bytes(signature)
            .map_err(|e| CryptoError::InvalidSignature(format!("G2 point deserialization: {e:?}")))?;

        let result = sig.verify(true, message, POP_DST, &[], &aggregate, false);
        Ok(result == BLST_ERROR::BLST_SUCCESS)
    }
}

/// Derive a secret key from at least 32 bytes of seed material.
pub fn secret_key_from_seed(seed: &[u8]) -> Result<SecretKey, CryptoError> {
    SecretKey::key_gen(seed, &[]).map_err(|e| CryptoError::InvalidSecretKey(format!("{e:?}")))
}

/// Compressed (48-byte) public key of `secret_key`.
pub fn public_key_bytes(secret_key: &SecretKey) -> Vec<u8> {
    secret_key.sk_to_pk().compress().to_vec()
}

/// Sign `message` and return the compressed signature.
pub fn sign(secret_key: &SecretKey, message: &[u8]) -> Vec<u8> {
    secret_key.sign(message, POP_DST, &[]).compress().to_vec()
}

/// Fold compressed signatures into a single compressed aggregate.
pub fn aggregate_signatures(signatures: &[&[u8]]) -> Result<Vec<u8>, CryptoError> {
    if signatures.is_empty() {
        return Err(CryptoError::EmptyKeySet);
    }
    let parsed = signatures
        .iter()
        .map(|bytes| {
            Signature::from_bytes(bytes)
                .map_err(|e| CryptoError::InvalidSignature(format!("G2 point deserialization: {e:?}")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let refs: Vec<&Signature> = parsed.iter().collect();
    let aggregate = AggregateSignature::aggregate(&refs, true)
        .map_err(|e| CryptoError::Aggregation(format!("{e:?}")))?;
    Ok(aggregate.to_signature().compress().to_vec())
}
