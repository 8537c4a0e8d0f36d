//! Filter shapes for the `/markets` and `/candles` endpoints.

use crate::error::{CoinCapError, Result};

/// Filters for `/markets`. Empty fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarketsRequest {
    pub exchange_id: String,
    pub base_symbol: String,
    pub base_id: String,
    pub quote_symbol: String,
    pub quote_id: String,
    pub asset_symbol: String,
    pub asset_id: String,
}

impl MarketsRequest {
    pub fn query(&self) -> Vec<(&'static str, String)> {
        [
            ("exchange", &self.exchange_id),
            ("baseSymbol", &self.base_symbol),
            ("baseId", &self.base_id),
            ("quoteSymbol", &self.quote_symbol),
            ("quoteId", &self.quote_id),
            ("assetSymbol", &self.asset_symbol),
            ("assetId", &self.asset_id),
        ]
        .into_iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| (k, v.clone()))
        .collect()
    }
}

/// Market selector for `/candles`. All three fields are required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandlesRequest {
    pub exchange_id: String,
    pub base_id: String,
    pub quote_id: String,
}

impl CandlesRequest {
    pub fn new(
        exchange_id: impl Into<String>,
        base_id: impl Into<String>,
        quote_id: impl Into<String>,
    ) -> Self {
        Self { exchange_id: exchange_id.into(), base_id: base_id.into(), quote_id: quote_id.into() }
    }

    /// Fails with [`CoinCapError::MissingParam`] on the first empty field.
    pub fn query(&self) -> Result<Vec<(&'static str, String)>> {
        if self.exchange_id.is_empty() {
            return Err(CoinCapError::MissingParam("ExchangeID"));
        }
        if self.base_id.is_empty() {
            return Err(CoinCapError::MissingParam("BaseID"));
        }
        if self.quote_id.is_empty() {
            return Err(CoinCapError::MissingParam("QuoteID"));
        }
        Ok(vec![
            ("exchange", self.exchange_id.clone()),
            ("baseId", self.base_id.clone()),
            ("quoteId", self.quote_id.clone()),
        ])
    }
}
