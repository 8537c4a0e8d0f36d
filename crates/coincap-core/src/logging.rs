//! Logging initialization using the `tracing` ecosystem.
//!
//! - Console output on stderr (human-readable or JSON lines)
//! - File output (daily rotation via `tracing-appender`)
//! - Filter taken from `RUST_LOG`, falling back to the configured level

use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogConfig, LogFormat};
use crate::error::{CoinCapError, Result};

/// Install the global tracing subscriber.
///
/// Call once at program start. `file_prefix` names the rotated log files
/// when `config.dir` is set. Fails if a subscriber is already installed.
pub fn init_logging(config: &LogConfig, file_prefix: &str) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let json = config.format == LogFormat::Json;
    let console_layer = fmt::layer().with_writer(std::io::stderr).with_target(true).with_ansi(!json);
    let console_layer = if json { console_layer.json().boxed() } else { console_layer.boxed() };

    let file_layer = config.dir.as_ref().map(|dir| {
        let file_appender = tracing_appender::rolling::daily(dir, file_prefix);
        fmt::layer().with_writer(file_appender).with_ansi(false).with_target(true)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| CoinCapError::Config(format!("logging already initialized: {e}")))
}
