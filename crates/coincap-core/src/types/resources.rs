//! REST resources returned inside the `data` field of the API envelope.
//!
//! The API quotes nearly every number, so numeric fields go through the
//! string-or-number helpers in [`crate::de`]. Fields the API is known to
//! send as `null` are `Option`s.

use serde::{Deserialize, Serialize};

use super::enums::RateType;
use crate::de::{
    bool_or_null, f64_str_or_num, opt_f64_str_or_num, opt_u64_str_or_num, u64_str_or_num,
};
use crate::time::Timestamp;

/// Well-known currency identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Currency {
    pub id: &'static str,
    pub symbol: &'static str,
}

impl Currency {
    pub const USD: Currency = Currency { id: "united-states-dollar", symbol: "USD" };
    pub const BTC: Currency = Currency { id: "bitcoin", symbol: "BTC" };
    pub const ETH: Currency = Currency { id: "ethereum", symbol: "ETH" };
}

/// An asset tracked by CoinCap (`/assets`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    /// Rank by market cap.
    #[serde(deserialize_with = "u64_str_or_num")]
    pub rank: u64,
    pub symbol: String,
    pub name: String,
    /// Supply available for trading.
    #[serde(deserialize_with = "f64_str_or_num")]
    pub supply: f64,
    /// Total quantity ever issued; `None` for uncapped assets.
    #[serde(default, deserialize_with = "opt_f64_str_or_num")]
    pub max_supply: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64_str_or_num")]
    pub market_cap_usd: Option<f64>,
    #[serde(default, rename = "volumeUsd24Hr", deserialize_with = "opt_f64_str_or_num")]
    pub volume_usd_24hr: Option<f64>,
    /// Volume-weighted price in USD.
    #[serde(deserialize_with = "f64_str_or_num")]
    pub price_usd: f64,
    #[serde(default, rename = "changePercent24Hr", deserialize_with = "opt_f64_str_or_num")]
    pub change_percent_24hr: Option<f64>,
    #[serde(default, rename = "vwap24Hr", deserialize_with = "opt_f64_str_or_num")]
    pub vwap_24hr: Option<f64>,
}

/// One point of an asset's USD price history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetHistory {
    #[serde(deserialize_with = "f64_str_or_num")]
    pub price_usd: f64,
    pub time: Timestamp,
}

/// A market an asset trades on (`/assets/{id}/markets`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMarket {
    pub exchange_id: String,
    pub base_id: String,
    pub quote_id: String,
    pub base_symbol: String,
    pub quote_symbol: String,
    #[serde(default, rename = "volumeUsd24Hr", deserialize_with = "opt_f64_str_or_num")]
    pub volume_usd_24hr: Option<f64>,
    #[serde(deserialize_with = "f64_str_or_num")]
    pub price_usd: f64,
    #[serde(default, deserialize_with = "opt_f64_str_or_num")]
    pub volume_percent: Option<f64>,
}

/// USD conversion rate of a fiat or crypto currency (`/rates`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rate {
    pub id: String,
    pub symbol: String,
    #[serde(default)]
    pub currency_symbol: Option<String>,
    #[serde(deserialize_with = "f64_str_or_num")]
    pub rate_usd: f64,
    #[serde(rename = "type")]
    pub kind: RateType,
}

/// An exchange tracked by CoinCap (`/exchanges`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exchange {
    #[serde(rename = "exchangeId")]
    pub id: String,
    pub name: String,
    #[serde(deserialize_with = "u64_str_or_num")]
    pub rank: u64,
    #[serde(default, deserialize_with = "opt_f64_str_or_num")]
    pub percent_total_volume: Option<f64>,
    #[serde(default, alias = "volumeUSD", deserialize_with = "opt_f64_str_or_num")]
    pub volume_usd: Option<f64>,
    #[serde(default, deserialize_with = "opt_u64_str_or_num")]
    pub trading_pairs: Option<u64>,
    /// Whether a trades WebSocket is available for this exchange. Missing
    /// or `null` means no.
    #[serde(default, deserialize_with = "bool_or_null")]
    pub socket: bool,
    #[serde(default, rename = "exchangeUrl")]
    pub url: Option<String>,
    pub updated: Timestamp,
}

/// A trading pair on an exchange (`/markets`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Market {
    pub exchange_id: String,
    #[serde(deserialize_with = "u64_str_or_num")]
    pub rank: u64,
    pub base_symbol: String,
    pub base_id: String,
    pub quote_symbol: String,
    pub quote_id: String,
    /// Quote units traded for one unit of base.
    #[serde(deserialize_with = "f64_str_or_num")]
    pub price_quote: f64,
    #[serde(deserialize_with = "f64_str_or_num")]
    pub price_usd: f64,
    #[serde(default, rename = "volumeUsd24Hr", deserialize_with = "opt_f64_str_or_num")]
    pub volume_usd_24hr: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64_str_or_num")]
    pub percent_exchange_volume: Option<f64>,
    #[serde(default, rename = "tradesCount24Hr", deserialize_with = "opt_u64_str_or_num")]
    pub trades_count_24hr: Option<u64>,
    pub updated: Timestamp,
}

/// OHLCV bar for one period (`/candles`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    #[serde(deserialize_with = "f64_str_or_num")]
    pub open: f64,
    #[serde(deserialize_with = "f64_str_or_num")]
    pub high: f64,
    #[serde(deserialize_with = "f64_str_or_num")]
    pub low: f64,
    #[serde(deserialize_with = "f64_str_or_num")]
    pub close: f64,
    #[serde(deserialize_with = "f64_str_or_num")]
    pub volume: f64,
    /// Start of the period.
    pub period: Timestamp,
}
