// Tue Jan 13 2026 - Alex

use crate::utils::LoggingUtils;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub const ENV_NO_MEMO: &str = "PPC_HOOK_NO_ASSEMBLY_MEMO";
pub const ENV_LOG: &str = "PPC_HOOK_LOG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub memoize_assembly: bool,
    pub log_level: String,
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            memoize_assembly: true,
            log_level: "info".to_string(),
            color: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an environment-style lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_NO_MEMO) {
            if matches!(value.trim(), "1" | "true" | "yes") {
                config.memoize_assembly = false;
            }
        }

        if let Some(level) = lookup(ENV_LOG) {
            if LoggingUtils::is_known_level(&level) {
                config.log_level = level.to_lowercase();
            }
        }

        config
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&text)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn with_memoize_assembly(mut self, memoize: bool) -> Self {
        self.memoize_assembly = memoize;
        self
    }

    pub fn with_log_level(mut self, level: &str) -> Self {
        self.log_level = level.to_string();
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if !LoggingUtils::is_known_level(&self.log_level) {
            return Err(format!("unknown log_level \"{}\"", self.log_level));
        }
        Ok(())
    }
}
