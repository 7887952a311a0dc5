//! Configuration for the remote parsing service
//!
//! Loaded from the host's TOML config file when present, otherwise defaults.
//! The credential is optional everywhere: its absence downgrades the pipeline
//! to heuristics-only instead of failing.

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Remote parsing service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// OpenAI-compatible chat completions endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Free-tier model tried first
    #[serde(default = "default_free_model")]
    pub free_model: String,

    /// Paid model used for the single escalation attempt
    #[serde(default = "default_paid_model")]
    pub paid_model: String,

    /// Access credential; absent means the remote stage is skipped
    #[serde(default)]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "https://openrouter.ai/api/v1/chat/completions".to_string()
}

fn default_free_model() -> String {
    "meta-llama/llama-3.2-1b-instruct:free".to_string()
}

fn default_paid_model() -> String {
    "meta-llama/llama-3.2-1b-instruct".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            free_model: default_free_model(),
            paid_model: default_paid_model(),
            api_key: None,
            timeout_secs: default_timeout(),
        }
    }
}

impl RemoteConfig {
    /// Load from a TOML file, falling back to defaults when the file is
    /// missing or unreadable. The `FINDIT_API_KEY` environment variable
    /// overrides the configured credential either way.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        let mut config = match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Self>(&contents) {
                Ok(config) => config,
                Err(e) => {
                    warn!("Invalid config at {}: {} - using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        };

        if let Ok(key) = std::env::var("FINDIT_API_KEY") {
            if !key.trim().is_empty() {
                config.api_key = Some(key);
            }
        }

        Ok(config)
    }
}
