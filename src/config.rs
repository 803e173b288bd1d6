//! Application configuration
//!
//! Loaded from a YAML file (`crm.yaml` by default); CLI flags override file
//! values. The credential store is a plain token file whose trimmed contents
//! are attached as the bearer token.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the REST backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path to the opaque bearer-token file; no token header when absent.
    #[serde(default)]
    pub token_file: Option<PathBuf>,

    /// Run against the seeded in-memory mock gateway instead of the backend.
    #[serde(default)]
    pub mock: bool,

    /// Artificial mock latency for list calls, in milliseconds.
    #[serde(default = "default_list_delay_ms")]
    pub mock_list_delay_ms: u64,

    /// Artificial mock latency for create/update/delete, in milliseconds.
    #[serde(default = "default_mutate_delay_ms")]
    pub mock_mutate_delay_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_list_delay_ms() -> u64 {
    1000
}

fn default_mutate_delay_ms() -> u64 {
    500
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token_file: None,
            mock: false,
            mock_list_delay_ms: default_list_delay_ms(),
            mock_mutate_delay_ms: default_mutate_delay_ms(),
        }
    }
}

impl AppConfig {
    /// Load from a YAML file; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Bearer token from the credential store, trimmed; `None` when no token
    /// file is configured or the file is empty.
    pub fn read_token(&self) -> Result<Option<String>> {
        let Some(path) = &self.token_file else {
            return Ok(None);
        };
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read token file {}", path.display()))?;
        let token = raw.trim();
        Ok((!token.is_empty()).then(|| token.to_string()))
    }
}
