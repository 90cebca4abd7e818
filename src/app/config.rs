use crate::error::ConfigError;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub api_base_url: String,
    pub api_key: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub log_file_path: PathBuf,
    /// Unit of the exponential backoff; retry `k` waits `backoff_unit_ms * 2^k`.
    pub backoff_unit_ms: u64,
    pub retry_jitter: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.paygateway.example.com".to_string(),
            api_key: String::new(),
            timeout_seconds: 30,
            max_retries: 3,
            log_file_path: PathBuf::from("logs").join("payment_gateway.log"),
            backoff_unit_ms: 1000,
            retry_jitter: false,
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            api_base_url: env::var("PAYGATEWAY_API_BASE_URL")
                .unwrap_or(defaults.api_base_url),
            api_key: env::var("PAYGATEWAY_API_KEY")
                .unwrap_or(defaults.api_key),
            timeout_seconds: env::var("PAYGATEWAY_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_seconds),
            max_retries: env::var("PAYGATEWAY_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_retries),
            log_file_path: env::var("PAYGATEWAY_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file_path),
            backoff_unit_ms: env::var("PAYGATEWAY_BACKOFF_UNIT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.backoff_unit_ms),
            retry_jitter: env::var("PAYGATEWAY_RETRY_JITTER")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.retry_jitter),
        }
    }

    /// Loads a TOML file; omitted keys keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Missing("api_key"));
        }
        if Url::parse(&self.api_base_url).is_err() {
            return Err(ConfigError::InvalidValue {
                key: "api_base_url",
                value: self.api_base_url.clone(),
            });
        }
        if self.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timeout_seconds",
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn backoff_unit(&self) -> Duration {
        Duration::from_millis(self.backoff_unit_ms)
    }
}
