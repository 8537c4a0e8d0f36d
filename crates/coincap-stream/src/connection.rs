//! Transport seam between a [`Stream`](crate::Stream) and the network.
//!
//! A [`Connector`] opens connections; a [`Connection`] yields raw frames
//! until it fails. Neither enforces timeouts: a blocked `next_frame` stays
//! blocked until the transport itself gives up.

use async_trait::async_trait;
use coincap_core::Result;

/// One persistent duplex message connection.
#[async_trait]
pub trait Connection: Send + 'static {
    /// Next payload frame. Control frames are handled internally.
    ///
    /// Remote closure and protocol faults are reported as
    /// [`CoinCapError::Read`](coincap_core::CoinCapError::Read).
    async fn next_frame(&mut self) -> Result<Vec<u8>>;

    /// Release the connection. Called exactly once, by the pump.
    async fn close(&mut self);
}

/// Factory for [`Connection`]s.
#[async_trait]
pub trait Connector: Send + Sync {
    type Conn: Connection;

    /// Establish a connection, or fail with
    /// [`CoinCapError::Connect`](coincap_core::CoinCapError::Connect).
    async fn open(&self, url: &str) -> Result<Self::Conn>;
}
