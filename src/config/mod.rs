//! Configuration management for warden

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub executor: ExecutorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Orchestrator base URL
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Which executor runs approved actions: "http" (backend sandbox) or
    /// "shell" (local subprocess)
    pub kind: String,
    /// Wall-clock limit for local shell execution, in seconds
    pub shell_timeout_secs: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            kind: "http".to_string(),
            shell_timeout_secs: 120,
        }
    }
}

impl Config {
    /// Load from the user config file, falling back to defaults.
    /// `WARDEN_BACKEND_URL` overrides the configured backend URL.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                toml::from_str(&raw)
                    .with_context(|| format!("invalid config at {}", path.display()))?
            }
            _ => Self::default(),
        };

        if let Ok(url) = std::env::var("WARDEN_BACKEND_URL") {
            if !url.trim().is_empty() {
                config.backend.base_url = url;
            }
        }
        Ok(config)
    }

    /// Write the config to the user config file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().context("could not determine the config directory")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let raw = toml::to_string_pretty(self).context("failed to serialize config")?;
        std::fs::write(&path, raw).with_context(|| format!("failed to write {}", path.display()))
    }

    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("warden").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_round_trip_through_toml() {
        let config = Config::default();
        let raw = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&raw).unwrap();
        assert_eq!(parsed.backend.base_url, config.backend.base_url);
        assert_eq!(parsed.backend.timeout_secs, 120);
        assert_eq!(parsed.executor.kind, "http");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let parsed: Config =
            toml::from_str("[backend]\nbase_url = \"http://10.0.0.2:9000\"\n").unwrap();
        assert_eq!(parsed.backend.base_url, "http://10.0.0.2:9000");
        assert_eq!(parsed.backend.timeout_secs, 120);
        assert_eq!(parsed.executor.kind, "http");
        assert_eq!(parsed.executor.shell_timeout_secs, 120);
    }
}
