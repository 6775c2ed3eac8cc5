// ⚙️ Configuration - JSON file, optional, with defaults for every field

use crate::auth::DEFAULT_SESSION_KEY;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "ENTITY_MANAGER_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// tracing filter directive (e.g. "entity_manager=debug"); RUST_LOG wins when set
    #[serde(default)]
    pub log_level: Option<String>,

    /// Emit JSON log lines instead of compact text
    #[serde(default)]
    pub json_logs: bool,

    /// CSV of users to load instead of the built-in demo accounts
    #[serde(default)]
    pub users_seed: Option<PathBuf>,

    /// Session key holding the current user
    #[serde(default = "default_session_key")]
    pub session_key: String,
}

fn default_session_key() -> String {
    DEFAULT_SESSION_KEY.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            log_level: None,
            json_logs: false,
            users_seed: None,
            session_key: default_session_key(),
        }
    }
}

impl AppConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: AppConfig =
            serde_json::from_str(&content).context("Failed to parse config JSON")?;

        Ok(config)
    }

    /// Load the file named by ENTITY_MANAGER_CONFIG, or defaults when unset
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load_from_file(PathBuf::from(path)),
            None => Ok(Self::default()),
        }
    }
}
