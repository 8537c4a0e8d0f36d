//! WebSocket transport over `tokio-tungstenite`.
//!
//! [`WsConnector`] performs the TLS/WebSocket handshake (optionally adding
//! extra handshake headers); [`WsConnection`] turns the message stream into
//! payload frames:
//! - Text and binary messages are returned as frames.
//! - Pings are answered with pongs and skipped.
//! - A close frame, a protocol error, or end of stream is a read error.

use std::collections::HashMap;

use async_trait::async_trait;
use coincap_core::{CoinCapError, Result};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{HeaderName, HeaderValue};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

use crate::connection::{Connection, Connector};

/// Opens WebSocket connections.
#[derive(Debug, Clone, Default)]
pub struct WsConnector {
    /// Extra HTTP headers for the handshake.
    extra_headers: HashMap<String, String>,
}

impl WsConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header sent with every handshake.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(key.into(), value.into());
        self
    }
}

#[async_trait]
impl Connector for WsConnector {
    type Conn = WsConnection;

    async fn open(&self, url: &str) -> Result<WsConnection> {
        let connect_err = |e: &dyn std::fmt::Display| CoinCapError::Connect(format!("{url}: {e}"));

        let mut request = url.into_client_request().map_err(|e| connect_err(&e))?;
        for (key, value) in &self.extra_headers {
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| connect_err(&e))?;
            let value = HeaderValue::from_str(value).map_err(|e| connect_err(&e))?;
            request.headers_mut().insert(name, value);
        }

        debug!("[ws] connecting to {url}");
        let (inner, _response) =
            tokio_tungstenite::connect_async(request).await.map_err(|e| connect_err(&e))?;

        Ok(WsConnection { inner, url: url.to_string() })
    }
}

/// One open WebSocket.
pub struct WsConnection {
    inner: WebSocketStream<MaybeTlsStream<TcpStream>>,
    url: String,
}

#[async_trait]
impl Connection for WsConnection {
    async fn next_frame(&mut self) -> Result<Vec<u8>> {
        loop {
            match self.inner.next().await {
                Some(Ok(Message::Text(text))) => return Ok(text.as_bytes().to_vec()),
                Some(Ok(Message::Binary(data))) => return Ok(data.to_vec()),
                Some(Ok(Message::Ping(data))) => {
                    if let Err(e) = self.inner.send(Message::Pong(data)).await {
                        return Err(CoinCapError::Read(format!("pong send failed: {e}")));
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    warn!("[ws] {} received close frame", self.url);
                    let reason = frame.map(|f| f.reason.to_string()).unwrap_or_default();
                    return Err(CoinCapError::Read(format!("closed by server: {reason}")));
                }
                Some(Ok(_)) => {} // Pong, raw Frame
                Some(Err(e)) => return Err(CoinCapError::Read(e.to_string())),
                None => return Err(CoinCapError::Read("stream ended".into())),
            }
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.inner.close(None).await {
            debug!("[ws] {} close: {e}", self.url);
        }
    }
}
