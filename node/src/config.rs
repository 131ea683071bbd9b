//! Node configuration with TOML file support.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::logging::LogFormat;
use crate::NodeError;

/// Configuration for a Tandem node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Rejected messages a peer may send before it should be disconnected.
    #[serde(default = "default_max_peer_strikes")]
    pub max_peer_strikes: u32,

    /// Heights of round messages kept before the oldest is dropped.
    #[serde(default = "default_retained_heights")]
    pub retained_heights: usize,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_peer_strikes() -> u32 {
    5
}

fn default_retained_heights() -> usize {
    2
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        let config: Self = toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    pub fn log_format(&self) -> Result<LogFormat, NodeError> {
        self.log_format.parse()
    }

    fn validate(&self) -> Result<(), NodeError> {
        self.log_format()?;
        if self.max_peer_strikes == 0 {
            return Err(NodeError::Config(
                "max_peer_strikes must be at least 1".to_string(),
            ));
        }
        if self.retained_heights == 0 {
            return Err(NodeError::Config(
                "retained_heights must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            log_format: default_log_format(),
            log_level: default_log_level(),
            max_peer_strikes: default_max_peer_strikes(),
            retained_heights: default_retained_heights(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = NodeConfig::default();
        let toml_str = config.to_toml_string().expect("should serialize");
        let parsed = NodeConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = NodeConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.log_format, "human");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.max_peer_strikes, 5);
        assert_eq!(config.retained_heights, 2);
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            log_format = "json"
            max_peer_strikes = 10
        "#;
        let config = NodeConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.log_format().unwrap(), LogFormat::Json);
        assert_eq!(config.max_peer_strikes, 10);
        assert_eq!(config.retained_heights, 2); // default
    }

    #[test]
    fn invalid_values_are_config_errors() {
        for toml in [
            r#"log_format = "xml""#,
            "max_peer_strikes = 0",
            "retained_heights = 0",
            "max_peer_strikes = -1",
        ] {
            let err = NodeConfig::from_toml_str(toml).unwrap_err();
            assert!(matches!(err, NodeError::Config(_)), "{toml}");
        }
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "log_level = \"debug\"").unwrap();
        let config = NodeConfig::from_toml_file(file.path()).expect("should load");
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = NodeConfig::from_toml_file("/nonexistent/tandem.toml");
        assert!(matches!(result, Err(NodeError::Config(_))));
    }
}
