use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("invalid secret key material: {0}")]
    InvalidSecretKey(String),

    #[error("no keys to aggregate")]
    EmptyKeySet,

    #[error("aggregation failed: {0}")]
    Aggregation(String),
}
