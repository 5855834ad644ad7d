// src/config.rs
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

pub const ENV_CONFIG_PATH: &str = "PRICER_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/pricer.toml";
pub const ENV_API_KEY: &str = "SCRAPER_API_KEY";
pub const ENV_API_URL: &str = "SCRAPER_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "FETCH_TIMEOUT_SECS";

fn default_base_url() -> String {
    "http://api.scraperapi.com".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

/// Pass-through fetch gateway settings.
#[derive(Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// "ENV" means: read from SCRAPER_API_KEY.
    #[serde(default)]
    pub api_key: String,
    /// Per-source fetch timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

// Keep the access key out of logs.
impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &format_args!("<{} chars>", self.api_key.len()))
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl GatewayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        let url = self.base_url.to_ascii_lowercase();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PricerConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
}

impl PricerConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load configuration using env var + fallbacks, then apply env overrides:
    /// 1) $PRICER_CONFIG_PATH
    /// 2) config/pricer.toml
    /// 3) built-in defaults
    pub fn load_default() -> Result<Self, ConfigError> {
        let mut cfg = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(ConfigError::MissingFile(ENV_CONFIG_PATH));
            }
            Self::load_from(&pb)?
        } else {
            let fallback = PathBuf::from(DEFAULT_CONFIG_PATH);
            if fallback.exists() {
                Self::load_from(&fallback)?
            } else {
                Self::default()
            }
        };
        cfg.apply_env()?;
        cfg.gateway.validate()?;
        Ok(cfg)
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        let gw = &mut self.gateway;
        if let Ok(url) = std::env::var(ENV_API_URL) {
            gw.base_url = url.trim().to_string();
        }
        match std::env::var(ENV_API_KEY) {
            Ok(key) => gw.api_key = key.trim().to_string(),
            // "ENV" without the variable set leaves no usable key
            Err(_) if gw.api_key.trim().eq_ignore_ascii_case("env") => gw.api_key.clear(),
            Err(_) => {}
        }
        if let Ok(raw) = std::env::var(ENV_TIMEOUT_SECS) {
            gw.timeout_secs = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: ENV_TIMEOUT_SECS,
                value: raw.clone(),
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_fills_defaults() {
        let cfg = PricerConfig::from_toml_str(
            r#"
[gateway]
api_key = "abc"
"#,
        )
        .unwrap();
        assert_eq!(cfg.gateway.base_url, "http://api.scraperapi.com");
        assert_eq!(cfg.gateway.timeout_secs, 30);
        assert_eq!(cfg.gateway.user_agent, "Mozilla/5.0");
        assert!(cfg.gateway.validate().is_ok());
    }

    #[test]
    fn debug_redacts_key() {
        let gw = GatewayConfig {
            api_key: "secret-key".into(),
            ..GatewayConfig::default()
        };
        let dbg = format!("{gw:?}");
        assert!(!dbg.contains("secret-key"));
        assert!(dbg.contains("<10 chars>"));
    }

    #[test]
    fn validation_catches_bad_values() {
        let mut gw = GatewayConfig::default();
        assert!(matches!(gw.validate(), Err(ConfigError::MissingApiKey)));
        gw.api_key = "k".into();
        gw.base_url = "ftp://x".into();
        assert!(matches!(gw.validate(), Err(ConfigError::InvalidBaseUrl(_))));
        gw.base_url = "https://gw.example".into();
        gw.timeout_secs = 0;
        assert!(matches!(gw.validate(), Err(ConfigError::ZeroTimeout)));
    }
}
