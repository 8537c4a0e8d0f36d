//! `/rates` endpoints.

use coincap_core::{Rate, Result, Timestamp};

use crate::client::{Client, segment};

impl Client {
    /// USD rates of all fiat and crypto currencies.
    pub async fn rates(&self) -> Result<(Vec<Rate>, Timestamp)> {
        self.get("rates", &[]).await
    }

    pub async fn rate_by_id(&self, id: &str) -> Result<(Rate, Timestamp)> {
        self.get(&format!("rates/{}", segment(id)), &[]).await
    }
}
