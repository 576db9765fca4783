//! App configuration loaded from `<config_dir>/edumaster/config.toml`

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_max_attempts() -> u32 {
    5
}

fn default_base_delay_ms() -> u64 {
    2_000
}

fn default_jitter_bound_ms() -> u64 {
    1_000
}

fn default_batch_delay_ms() -> u64 {
    500
}

/// Retry policy for transient provider failures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// First backoff delay; doubles on each subsequent attempt
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Upper bound (exclusive) for the random jitter added to each delay
    #[serde(default = "default_jitter_bound_ms")]
    pub jitter_bound_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            jitter_bound_ms: default_jitter_bound_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Model id passed to the Generative Language API
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL (overridable for tests/proxies)
    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default)]
    pub retry: RetryConfig,

    /// Fixed pause between sequential batch-export generation calls,
    /// to stay under provider rate limits
    #[serde(default = "default_batch_delay_ms")]
    pub batch_delay_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base: default_api_base(),
            retry: RetryConfig::default(),
            batch_delay_ms: default_batch_delay_ms(),
        }
    }
}

impl AppConfig {
    /// Load config from the default location; a missing file yields defaults
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config {}", path.display()))?;
        Ok(())
    }

    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("edumaster").join("config.toml"))
    }

    /// API key for the provider; required for any generation command
    pub fn api_key(&self) -> Result<String> {
        std::env::var("GEMINI_API_KEY")
            .context("GEMINI_API_KEY is not set. Export it before running generation commands")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.base_delay_ms, 2_000);
        assert_eq!(config.batch_delay_ms, 500);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "model = \"gemini-2.5-pro\"\n").unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.retry.max_attempts, 5);
    }

    #[test]
    fn test_save_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        let mut config = AppConfig::default();
        config.batch_delay_ms = 250;
        config.save(&path).unwrap();

        let restored = AppConfig::load_from(&path).unwrap();
        assert_eq!(restored.batch_delay_ms, 250);
    }
}
