//! Configuration management
//!
//! Loads ledger settings from a JSON file, with environment-variable
//! overrides for deployment paths.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Ledger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database path. Overridden by `LOTTO_DB_PATH`.
    pub db_path: PathBuf,
    /// JSON mirror written after every mutation; `None` disables mirroring.
    /// Overridden by `LOTTO_MIRROR_PATH`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            db_path: PathBuf::from("trades.db"),
            mirror_path: Some(PathBuf::from("trades.json")),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file, then apply env overrides.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path.as_ref()).context("Failed to read config file")?;
        let mut config: Config =
            serde_json::from_str(&contents).context("Failed to parse config JSON")?;
        config.apply_env();
        Ok(config)
    }

    /// Defaults plus env overrides, for running without a config file.
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env();
        config
    }

    fn apply_env(&mut self) {
        if let Ok(path) = std::env::var("LOTTO_DB_PATH") {
            self.db_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("LOTTO_MIRROR_PATH") {
            self.mirror_path = if path.is_empty() {
                None
            } else {
                Some(PathBuf::from(path))
            };
        }
    }
}
