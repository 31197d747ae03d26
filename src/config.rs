//! Persistent command-line configuration
//!
//! Stores the archive location, tree name and threshold in a JSON file at
//! `<config_dir>/shotlength/config.json`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_tree() -> String {
    shotlength_core::DEFAULT_TREE.to_string()
}

fn default_threshold() -> f64 {
    shotlength_core::DEFAULT_THRESHOLD
}

/// Persistent application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Tree archive root (None = must be given on the command line)
    #[serde(default)]
    pub archive: Option<PathBuf>,
    /// Tree the plasma current is read from
    #[serde(default = "default_tree")]
    pub tree: String,
    /// Termination threshold in amperes
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            archive: None,
            tree: default_tree(),
            threshold: default_threshold(),
        }
    }
}

impl AppConfig {
    /// Config file path: `<config_dir>/shotlength/config.json`
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("shotlength")
            .join("config.json")
    }

    /// Load config from `path`, falling back to defaults on any error
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    tracing::info!(path = %path.display(), "Loaded config from disk");
                    config
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Save config to disk, creating parent directories if needed
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        tracing::info!(path = %path.display(), "Config saved to disk");
        Ok(())
    }
}
