//! Client configuration.
//!
//! Every field has a production default, so an empty JSON object is a valid
//! config. Values can be loaded from a file with [`load_config`].
//!
//! # Example config
//!
//! ```json
//! {
//!   "rest_url": "https://api.coincap.io/v2",
//!   "ws_url": "wss://ws.coincap.io",
//!   "request_timeout_secs": 10,
//!   "log": { "level": "debug", "dir": "/tmp/coincap", "format": "json" }
//! }
//! ```

use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::error::{CoinCapError, Result};

/// Top-level client configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClientConfig {
    /// REST base URL, without trailing slash.
    #[serde(default = "default_rest_url")]
    pub rest_url: String,

    /// WebSocket base URL; `/trades/{id}` and `/prices` are appended.
    #[serde(default = "default_ws_url")]
    pub ws_url: String,

    /// `User-Agent` header for REST calls.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout for REST calls, in seconds. `0` disables it.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub log: LogConfig,
}

/// Logging block of the config.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LogConfig {
    /// Default filter if `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Directory for daily-rotating log files.
    #[serde(default)]
    pub dir: Option<String>,
    #[serde(default)]
    pub format: LogFormat,
}

/// Output format of the log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rest_url: default_rest_url(),
            ws_url: default_ws_url(),
            user_agent: default_user_agent(),
            request_timeout_secs: default_request_timeout(),
            log: LogConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: default_log_level(), dir: None, format: LogFormat::default() }
    }
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    /// Check that both base URLs parse and use the expected schemes.
    pub fn validate(&self) -> Result<()> {
        check_url(&self.rest_url, &["http", "https"])?;
        check_url(&self.ws_url, &["ws", "wss"])?;
        Ok(())
    }
}

fn check_url(raw: &str, schemes: &[&str]) -> Result<()> {
    let parsed =
        url::Url::parse(raw).map_err(|e| CoinCapError::Config(format!("bad url {raw:?}: {e}")))?;
    if !schemes.contains(&parsed.scheme()) {
        return Err(CoinCapError::Config(format!(
            "url {raw:?} must use one of {schemes:?}"
        )));
    }
    Ok(())
}

fn default_rest_url() -> String {
    "https://api.coincap.io/v2".to_string()
}

fn default_ws_url() -> String {
    "wss://ws.coincap.io".to_string()
}

fn default_user_agent() -> String {
    concat!("coincap-rs/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load, parse and validate a JSON config file.
pub fn load_config(path: &std::path::Path) -> anyhow::Result<ClientConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: ClientConfig = serde_json::from_str(&content)
        .with_context(|| format!("parsing config {}", path.display()))?;
    config.validate()?;
    tracing::debug!("[config] loaded {} (rest={}, ws={})", path.display(), config.rest_url, config.ws_url);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config: ClientConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
        config.validate().unwrap();
    }

    #[test]
    fn partial_override() {
        let config: ClientConfig = serde_json::from_str(
            r#"{"ws_url":"ws://127.0.0.1:9000","request_timeout_secs":0,"log":{"format":"json"}}"#,
        )
        .unwrap();
        assert_eq!(config.ws_url, "ws://127.0.0.1:9000");
        assert_eq!(config.rest_url, default_rest_url());
        assert!(config.request_timeout().is_none());
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn wrong_scheme_is_rejected() {
        let config = ClientConfig { ws_url: "https://ws.coincap.io".into(), ..Default::default() };
        assert!(matches!(config.validate(), Err(CoinCapError::Config(_))));
    }

    #[test]
    fn load_from_file() {
        let path = std::env::temp_dir().join(format!("coincap-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"rest_url":"http://localhost:8080/v2"}"#).unwrap();
        let config = load_config(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.rest_url, "http://localhost:8080/v2");
    }
}
