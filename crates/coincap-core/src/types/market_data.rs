//! Payloads pushed over the WebSocket feeds.
//!
//! Each frame decodes into exactly one value: a [`Trade`] on the trades feed,
//! a [`PriceSnapshot`] on the prices feed. Snapshots are never merged.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::enums::Direction;
use crate::de::{f64_str_or_num, map_f64_str_or_num};
use crate::error::Result;
use crate::time::Timestamp;

/// A single executed transaction reported by an exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    /// Exchange identifier (e.g. `binance`).
    pub exchange: String,
    /// Asset id of the purchased asset.
    pub base: String,
    /// Asset id of the asset used to pay.
    pub quote: String,
    pub direction: Direction,
    #[serde(deserialize_with = "f64_str_or_num")]
    pub price: f64,
    #[serde(deserialize_with = "f64_str_or_num")]
    pub volume: f64,
    /// Execution time in milliseconds.
    pub timestamp: Timestamp,
    /// Price normalized to USD.
    #[serde(alias = "priceUds", deserialize_with = "f64_str_or_num")]
    pub price_usd: f64,
}

/// Asset id → USD price, as of one prices-feed frame.
pub type PriceSnapshot = HashMap<String, f64>;

#[derive(Deserialize)]
#[serde(transparent)]
struct PriceFrame(#[serde(deserialize_with = "map_f64_str_or_num")] PriceSnapshot);

/// Decode one prices-feed frame; values may be quoted or bare numbers.
pub fn decode_price_snapshot(frame: &[u8]) -> Result<PriceSnapshot> {
    let PriceFrame(snapshot) = serde_json::from_slice(frame)?;
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoinCapError;

    #[test]
    fn parse_trade_frame() {
        let json = r#"{"exchange":"binance","base":"bitcoin","quote":"tether","direction":"sell","price":6517.23,"volume":"0.0139","timestamp":1533581350282,"priceUsd":6517.23}"#;
        let trade: Trade = serde_json::from_str(json).unwrap();
        assert_eq!(trade.exchange, "binance");
        assert_eq!(trade.base, "bitcoin");
        assert_eq!(trade.direction, Direction::Sell);
        assert!((trade.volume - 0.0139).abs() < 1e-12);
        assert_eq!(trade.timestamp, Timestamp(1_533_581_350_282));
        assert_eq!(trade.price_usd, 6517.23);
    }

    #[test]
    fn trade_accepts_misspelled_usd_field() {
        let json = r#"{"exchange":"kraken","base":"ethereum","quote":"bitcoin","direction":"buy","price":"0.07","volume":3,"timestamp":1,"priceUds":"455.1"}"#;
        let trade: Trade = serde_json::from_str(json).unwrap();
        assert_eq!(trade.direction, Direction::Buy);
        assert_eq!(trade.price_usd, 455.1);
    }

    #[test]
    fn parse_price_frame() {
        let snap = decode_price_snapshot(br#"{"bitcoin":"6929.82","ethereum":404.97}"#).unwrap();
        assert_eq!(snap.len(), 2);
        assert_eq!(snap["bitcoin"], 6929.82);
        assert_eq!(snap["ethereum"], 404.97);
    }

    #[test]
    fn price_snapshot_reencodes_exactly() {
        let snap =
            decode_price_snapshot(br#"{"bitcoin":"6929.821234567891","monero":"0.1"}"#).unwrap();
        let encoded = serde_json::to_vec(&snap).unwrap();
        let again = decode_price_snapshot(&encoded).unwrap();
        assert_eq!(snap, again);
    }

    #[test]
    fn bad_price_frame_is_decode_error() {
        let err = decode_price_snapshot(br#"{"bitcoin":"n/a"}"#).unwrap_err();
        assert!(matches!(err, CoinCapError::Decode(_)));
        let err = decode_price_snapshot(b"[1,2]").unwrap_err();
        assert!(matches!(err, CoinCapError::Decode(_)));
    }

    #[test]
    fn non_finite_price_is_decode_error() {
        let err = decode_price_snapshot(br#"{"bitcoin":"NaN"}"#).unwrap_err();
        assert!(matches!(err, CoinCapError::Decode(_)));
        let err = decode_price_snapshot(br#"{"bitcoin":"6929.82","ethereum":"inf"}"#).unwrap_err();
        assert!(matches!(err, CoinCapError::Decode(_)));
    }
}
