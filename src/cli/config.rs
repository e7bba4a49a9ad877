// ABOUTME: Configuration management for the sprig CLI
// ABOUTME: Loads logging settings from an optional YAML file and environment variables

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Names a YAML config file to load.
pub const CONFIG_PATH_VAR: &str = "SPRIG_CONFIG";
pub const LOG_LEVEL_VAR: &str = "SPRIG_LOG_LEVEL";
pub const LOG_FORMAT_VAR: &str = "SPRIG_LOG_FORMAT";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        // stdout carries the rendered template, so stay quiet unless asked
        Self {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a file path (if it exists), then apply environment overrides.
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let mut config = match path {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                serde_yaml::from_str(&contents)
                    .with_context(|| format!("failed to parse config {}", path.display()))?
            }
            _ => Config::default(),
        };

        config.merge_env();
        Ok(config)
    }

    /// Load using `SPRIG_CONFIG` to locate the file.
    pub fn from_env() -> Result<Self> {
        Self::load(std::env::var_os(CONFIG_PATH_VAR).map(PathBuf::from))
    }

    fn merge_env(&mut self) {
        if let Ok(level) = std::env::var(LOG_LEVEL_VAR) {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var(LOG_FORMAT_VAR) {
            self.logging.format = format;
        }
    }
}
