//! Shared utilities for Tandem nodes.

pub mod stats;

pub use stats::StatsCounter;
