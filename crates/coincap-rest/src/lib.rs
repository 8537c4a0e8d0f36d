//! # coincap-rest
//!
//! Async client for the CoinCap v2 REST API.
//!
//! Every call is a single GET whose response is wrapped in the API envelope
//! `{ "data": ..., "timestamp": ... }`; methods return the decoded payload
//! together with the server [`Timestamp`](coincap_core::Timestamp).
//!
//! | Resource   | Methods                                                      |
//! |------------|--------------------------------------------------------------|
//! | Assets     | `assets`, `assets_search`, `assets_by_ids`, `asset_by_id`, `asset_history`, `asset_markets` |
//! | Rates      | `rates`, `rate_by_id`                                        |
//! | Exchanges  | `exchanges`, `exchange_by_id`                                |
//! | Markets    | `markets`                                                    |
//! | Candles    | `candles`                                                    |

pub mod assets;
pub mod candles;
pub mod client;
pub mod exchanges;
pub mod markets;
pub mod rates;

use async_trait::async_trait;
use coincap_core::{Asset, Exchange, Result};

pub use client::{Client, decode_envelope};

/// Lookups the stream drivers need before opening a subscription.
///
/// [`Client`] implements this against the live API; tests substitute an
/// in-memory directory.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Exchange with the given id, or [`NotFound`](coincap_core::CoinCapError::NotFound).
    async fn exchange_by_id(&self, id: &str) -> Result<Exchange>;

    /// Every asset matching one of `ids`. Unknown ids are simply absent.
    async fn assets_by_ids(&self, ids: &[String]) -> Result<Vec<Asset>>;
}

#[async_trait]
impl Directory for Client {
    async fn exchange_by_id(&self, id: &str) -> Result<Exchange> {
        Client::exchange_by_id(self, id).await.map(|(e, _)| e)
    }

    async fn assets_by_ids(&self, ids: &[String]) -> Result<Vec<Asset>> {
        Client::assets_by_ids(self, ids).await.map(|(a, _)| a)
    }
}
