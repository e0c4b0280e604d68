//! Configuration management for secretly
//!
//! Only ambient settings live here. Where secrets are stored is fixed and
//! not configurable.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// User configuration, read from `~/.config/secretly/config.json`
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Log filter used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load config from file, falling back to defaults when it is absent
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid config {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }
}
