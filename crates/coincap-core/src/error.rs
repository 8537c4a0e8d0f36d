//! Typed error definitions for the CoinCap client.
//!
//! [`CoinCapError`] covers every failure the library surfaces: transport and
//! decode failures captured by a stream's pump, request-shape errors raised
//! synchronously before any I/O, and REST response failures. The enum is
//! `Clone` so a stream's terminal error can be read any number of times.

use thiserror::Error;

/// Convenience alias used across the workspace.
pub type Result<T, E = CoinCapError> = std::result::Result<T, E>;

/// Domain-specific errors for the CoinCap client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoinCapError {
    /// The transport failed to establish a connection.
    #[error("connect error: {0}")]
    Connect(String),

    /// The transport closed or faulted mid-stream.
    #[error("read error: {0}")]
    Read(String),

    /// A payload could not be decoded into the expected type.
    #[error("decode error: {0}")]
    Decode(String),

    /// Caller-supplied identifiers are invalid.
    #[error("validation error: {0}")]
    Validation(String),

    /// The requested feature is not offered by the chosen exchange.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// The requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Unknown interval, or an extended interval where it is not allowed.
    #[error("invalid interval: {0}")]
    InvalidInterval(String),

    /// Start/end pair is incomplete, reversed, or reaches into the future.
    #[error("invalid time span: {0}")]
    InvalidTimeSpan(String),

    /// The time span is shorter than the requested interval.
    #[error("interval {interval} is longer than the time span ({span_ms} ms)")]
    IntervalTooCoarse { interval: &'static str, span_ms: i64 },

    /// A required request parameter is empty.
    #[error("{0} is required")]
    MissingParam(&'static str),

    /// The HTTP request itself failed (DNS, TLS, timeout, ...).
    #[error("http error: {0}")]
    Http(String),

    /// The API answered with a non-success status.
    #[error("api error (status {status}): {body}")]
    Api { status: u16, body: String },

    /// Configuration parsing or validation error.
    #[error("config error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for CoinCapError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_errors_become_decode_errors() {
        let err: CoinCapError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, CoinCapError::Decode(_)));
    }

    #[test]
    fn display_messages() {
        assert_eq!(CoinCapError::MissingParam("ExchangeID").to_string(), "ExchangeID is required");
        let coarse = CoinCapError::IntervalTooCoarse { interval: "h1", span_ms: 60_000 };
        assert_eq!(coarse.to_string(), "interval h1 is longer than the time span (60000 ms)");
    }
}
