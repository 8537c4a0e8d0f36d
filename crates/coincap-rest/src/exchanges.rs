//! `/exchanges` endpoints.

use coincap_core::{Exchange, Result, Timestamp};

use crate::client::{Client, segment};

impl Client {
    /// Every exchange CoinCap tracks.
    pub async fn exchanges(&self) -> Result<(Vec<Exchange>, Timestamp)> {
        self.get("exchanges", &[]).await
    }

    /// One exchange; [`NotFound`](coincap_core::CoinCapError::NotFound) if unknown.
    pub async fn exchange_by_id(&self, id: &str) -> Result<(Exchange, Timestamp)> {
        self.get(&format!("exchanges/{}", segment(id)), &[]).await
    }
}
