//! Tandem node: the pieces that sit between the network and the vote ledger.
//!
//! - Decodes and checks inbound votes before they reach the ledger
//! - Keeps per-peer misbehaviour strikes and per-reason rejection counters
//! - Resolves committees by height
//! - Loads configuration and sets up structured logging

pub mod committees;
pub mod config;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod peers;

pub use committees::InMemoryCommittees;
pub use config::NodeConfig;
pub use error::NodeError;
pub use ingest::{IngestOutcome, RejectReason, VoteIngestor};
pub use logging::{init_from_config, init_logging, LogFormat};
pub use peers::PeerScores;
