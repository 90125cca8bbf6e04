//! Node configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::NodeError;

/// Configuration for a CORD node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). The validator address list is
/// the membership configuration: loaded once at startup, static for the
/// process lifetime.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Data directory for durable storage.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Validator base URLs to probe for membership, in configuration order.
    #[serde(default)]
    pub validators: Vec<String>,

    /// Seconds between membership probe cycles.
    #[serde(default = "default_probe_interval_secs")]
    pub probe_interval_secs: u64,

    /// Per-request timeout for a single identity probe, in seconds.
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    /// Milliseconds between consensus sweep passes.
    #[serde(default = "default_sweep_interval_ms")]
    pub sweep_interval_ms: u64,

    /// Grace period for votes that arrive before their record opens,
    /// in milliseconds. One retry, then the vote is rejected.
    #[serde(default = "default_intake_grace_ms")]
    pub intake_grace_ms: u64,

    /// Capacity of the outbound propagation channel.
    #[serde(default = "default_outbound_capacity")]
    pub outbound_capacity: usize,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./cord_data")
}

fn default_probe_interval_secs() -> u64 {
    10
}

fn default_probe_timeout_secs() -> u64 {
    5
}

fn default_sweep_interval_ms() -> u64 {
    1000
}

fn default_intake_grace_ms() -> u64 {
    5000
}

fn default_outbound_capacity() -> usize {
    4096
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("NodeConfig is always serializable to TOML")
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            validators: Vec::new(),
            probe_interval_secs: default_probe_interval_secs(),
            probe_timeout_secs: default_probe_timeout_secs(),
            sweep_interval_ms: default_sweep_interval_ms(),
            intake_grace_ms: default_intake_grace_ms(),
            outbound_capacity: default_outbound_capacity(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
