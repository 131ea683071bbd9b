use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("committee error: {0}")]
    Committee(#[from] tandem_types::TypesError),

    #[error("config error: {0}")]
    Config(String),

    #[error("logging error: {0}")]
    Logging(String),
}
