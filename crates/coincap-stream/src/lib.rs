//! # coincap-stream
//!
//! Push feeds of the CoinCap WebSocket API.
//!
//! ## Architecture
//!
//! ```text
//! StreamClient ── validates via Directory (REST) ──┐
//!                                                  ▼
//!                    Connector::open(url) ──► Connection
//!                                                  │ owned by
//!                                                  ▼
//!                 pump task: next_frame → decode → deliver-or-stop
//!                                                  │ capacity-1 channel
//!                                                  ▼
//!                           Stream<T>: next() / values() / close()
//! ```
//!
//! - [`connection`]: the `Connector`/`Connection` seam
//! - [`ws`]: WebSocket connector over `tokio-tungstenite`
//! - [`stream`]: the generic `Stream<T>` and its pump
//! - [`subscribe`]: trade and price subscription drivers

pub mod connection;
pub mod stream;
pub mod subscribe;
pub mod ws;

#[cfg(test)]
pub(crate) mod testing;

pub use connection::{Connection, Connector};
pub use stream::{Closer, Decoder, Stream};
pub use subscribe::StreamClient;
pub use ws::{WsConnection, WsConnector};
