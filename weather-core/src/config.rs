use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::PathBuf};

use crate::provider::Upstream;

/// Environment variable holding the history API key.
pub const API_KEY_ENV: &str = "API_KEY";
/// Environment variable overriding the listen address.
pub const BIND_ENV: &str = "WEATHER_BIND";
pub const DEFAULT_BIND: &str = "127.0.0.1:8000";

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// WeatherAPI.com key used by the yesterday endpoint.
    pub api_key: Option<String>,

    /// Listen address, e.g. "0.0.0.0:8000".
    pub bind: Option<String>,

    /// Example TOML:
    /// [endpoints]
    /// archive = "http://localhost:9000/v1/archive"
    #[serde(default)]
    pub endpoints: HashMap<String, String>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-history", "weather-server")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Reject endpoint overrides for upstreams we don't know about.
    pub fn validate(&self) -> Result<()> {
        for key in self.endpoints.keys() {
            Upstream::try_from(key.as_str())?;
        }
        Ok(())
    }

    /// Overlay values from the process environment. Empty values are ignored.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty(API_KEY_ENV) {
            self.api_key = Some(key);
        }
        if let Some(bind) = non_empty(BIND_ENV) {
            self.bind = Some(bind);
        }
    }

    /// API key, or an error explaining how to provide one.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            anyhow!(
                "No API key configured for the history upstream.\n\
                 Hint: set {API_KEY_ENV} (or add it to .env), or run `weather-server configure`."
            )
        })
    }

    pub fn bind_addr(&self) -> &str {
        self.bind.as_deref().unwrap_or(DEFAULT_BIND)
    }

    /// Base URL for an upstream, honouring overrides.
    pub fn endpoint(&self, upstream: Upstream) -> &str {
        self.endpoints
            .get(upstream.as_str())
            .map(String::as_str)
            .unwrap_or_else(|| upstream.default_url())
    }

    pub fn set_endpoint(&mut self, upstream: Upstream, url: String) {
        self.endpoints.insert(upstream.as_str().to_string(), url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_api_key_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.require_api_key().unwrap_err();

        assert!(err.to_string().contains("No API key configured"));
        assert!(err.to_string().contains("API_KEY"));
    }

    #[test]
    fn env_overrides_file_values() {
        let mut cfg = Config {
            api_key: Some("FROM_FILE".into()),
            bind: Some("0.0.0.0:1".into()),
            ..Config::default()
        };

        cfg.apply_env_from(|name| match name {
            API_KEY_ENV => Some("FROM_ENV".into()),
            BIND_ENV => Some("   ".into()),
            _ => None,
        });

        assert_eq!(cfg.require_api_key().unwrap(), "FROM_ENV");
        assert_eq!(cfg.bind_addr(), "0.0.0.0:1");
    }

    #[test]
    fn bind_defaults_when_unset() {
        assert_eq!(Config::default().bind_addr(), DEFAULT_BIND);
    }

    #[test]
    fn endpoints_fall_back_to_defaults() {
        let mut cfg = Config::default();
        cfg.set_endpoint(Upstream::Archive, "http://localhost:9000/v1/archive".into());

        assert_eq!(cfg.endpoint(Upstream::Archive), "http://localhost:9000/v1/archive");
        assert_eq!(cfg.endpoint(Upstream::Geocoding), Upstream::Geocoding.default_url());
        assert_eq!(cfg.endpoint(Upstream::History), Upstream::History.default_url());
    }

    #[test]
    fn parses_toml_and_rejects_unknown_endpoint() {
        let cfg: Config = toml::from_str(
            r#"
            api_key = "abc"

            [endpoints]
            history = "http://localhost/history.json"
            "#,
        )
        .unwrap();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.endpoint(Upstream::History), "http://localhost/history.json");

        let bad: Config = toml::from_str("[endpoints]\nforecast = \"http://x\"\n").unwrap();
        let err = bad.validate().unwrap_err();
        assert!(err.to_string().contains("Unknown upstream"));
    }
}
