//! Application configuration.

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokengrid_core::Instrument;

/// Feed section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Delivery interval in milliseconds. Default: 3,000 (3 seconds).
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Fixed RNG seed for reproducible runs. Unset means OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_tick_interval_ms() -> u64 {
    3_000
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            seed: None,
        }
    }
}

/// Highlight section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightSection {
    /// How long a highlight stays visible (ms). Default: 500.
    #[serde(default = "default_highlight_duration_ms")]
    pub duration_ms: u64,
    /// Sweeper interval for evicting expired entries (ms). Default: 250.
    #[serde(default = "default_sweep_interval_ms")]
    pub sweep_interval_ms: u64,
}

fn default_highlight_duration_ms() -> u64 {
    500
}

fn default_sweep_interval_ms() -> u64 {
    250
}

impl Default for HighlightSection {
    fn default() -> Self {
        Self {
            duration_ms: default_highlight_duration_ms(),
            sweep_interval_ms: default_sweep_interval_ms(),
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub highlight: HighlightSection,
    /// Instrument set tracked for the session. Unset means the
    /// built-in demo catalog.
    #[serde(default)]
    pub catalog: Option<Vec<Instrument>>,
}

impl AppConfig {
    /// Load configuration from the default location.
    pub fn load() -> AppResult<Self> {
        let config_path = std::env::var("TOKENGRID_CONFIG")
            .unwrap_or_else(|_| "config/default.toml".to_string());

        if Path::new(&config_path).exists() {
            Self::from_file(&config_path)
        } else {
            tracing::warn!(path = %config_path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }
}
