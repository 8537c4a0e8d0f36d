//! HTTP plumbing shared by all resource methods.

use coincap_core::config::ClientConfig;
use coincap_core::{CoinCapError, Result, Timestamp};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Query string as ordered key/value pairs.
pub(crate) type Query = Vec<(&'static str, String)>;

/// CoinCap REST client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    /// Shared HTTP client (gzip-enabled).
    http: reqwest::Client,
    /// Base URL without trailing slash (e.g. `https://api.coincap.io/v2`).
    base_url: String,
}

impl Client {
    /// Build a client from config (base URL, user agent, timeout).
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| CoinCapError::Config(format!("building http client: {e}")))?;
        Ok(Self { http, base_url: config.rest_url.trim_end_matches('/').to_string() })
    }

    /// Client with default settings against another base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `{base}/{path}` and unwrap the envelope.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<(T, Timestamp)> {
        let url = format!("{}/{}", self.base_url, path);
        debug!("[rest] GET {url} {query:?}");

        let resp = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| CoinCapError::Http(e.to_string()))?;

        let status = resp.status().as_u16();
        let body = resp.bytes().await.map_err(|e| CoinCapError::Http(e.to_string()))?;

        decode_envelope(path, status, &body).inspect_err(|e| warn!("[rest] GET {path} failed: {e}"))
    }
}

/// Percent-encode one path segment (an asset or exchange id).
pub(crate) fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    #[serde(default)]
    timestamp: Timestamp,
    error: Option<String>,
}

/// Turn a raw response into `(payload, timestamp)`.
///
/// 404 or a `null` payload map to [`CoinCapError::NotFound`]; any other
/// non-2xx status to [`CoinCapError::Api`]; a malformed body to
/// [`CoinCapError::Decode`].
pub fn decode_envelope<T: DeserializeOwned>(
    path: &str,
    status: u16,
    body: &[u8],
) -> Result<(T, Timestamp)> {
    if status == 404 {
        return Err(CoinCapError::NotFound(path.to_string()));
    }
    if !(200..300).contains(&status) {
        return Err(CoinCapError::Api { status, body: String::from_utf8_lossy(body).into_owned() });
    }

    let envelope: Envelope<T> = serde_json::from_slice(body)?;
    match envelope.data {
        Some(data) => Ok((data, envelope.timestamp)),
        None => Err(CoinCapError::NotFound(envelope.error.unwrap_or_else(|| path.to_string()))),
    }
}
