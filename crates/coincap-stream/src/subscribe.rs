//! Trade and price subscription drivers.
//!
//! Both drivers validate their inputs through a [`Directory`] before any
//! connection is attempted, then open a [`Stream`] at the composed URL:
//!
//! | Feed   | URL                                   | Value           |
//! |--------|---------------------------------------|-----------------|
//! | Trades | `{ws_url}/trades/{exchange}`          | [`Trade`]       |
//! | Prices | `{ws_url}/prices?assets={ids or ALL}` | [`PriceSnapshot`] |

use coincap_core::config::ClientConfig;
use coincap_core::{CoinCapError, PriceSnapshot, Result, Trade, decode_price_snapshot};
use coincap_rest::{Client, Directory};
use tracing::{debug, info};

use crate::connection::Connector;
use crate::stream::Stream;
use crate::ws::WsConnector;

/// Sentinel asset list meaning "every asset".
pub const ALL_ASSETS: &str = "ALL";

/// Entry point for the push feeds.
///
/// Generic over the lookup and transport so either can be replaced; the
/// default pairing is the REST [`Client`] and [`WsConnector`].
pub struct StreamClient<D = Client, C = WsConnector> {
    directory: D,
    connector: C,
    ws_url: String,
}

impl StreamClient {
    /// REST client plus WebSocket connector, both from `config`.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self::with_parts(Client::new(config)?, WsConnector::new(), config.ws_url.clone()))
    }
}

impl<D: Directory, C: Connector> StreamClient<D, C> {
    pub fn with_parts(directory: D, connector: C, ws_url: impl Into<String>) -> Self {
        let ws_url: String = ws_url.into();
        Self { directory, connector, ws_url: ws_url.trim_end_matches('/').to_string() }
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn trades_url(&self, exchange_id: &str) -> String {
        format!("{}/trades/{}", self.ws_url, urlencoding::encode(exchange_id))
    }

    /// Prices URL for `asset_ids`; empty means [`ALL_ASSETS`].
    pub fn prices_url<S: AsRef<str>>(&self, asset_ids: &[S]) -> String {
        let assets = if asset_ids.is_empty() {
            ALL_ASSETS.to_string()
        } else {
            asset_ids
                .iter()
                .map(|id| urlencoding::encode(id.as_ref()).into_owned())
                .collect::<Vec<_>>()
                .join(",")
        };
        format!("{}/prices?assets={assets}", self.ws_url)
    }

    /// Subscribe to every trade executed on `exchange_id`.
    ///
    /// Fails with `NotFound` for an unknown exchange and `Unsupported` when
    /// the exchange offers no trade socket; no connection is attempted then.
    pub async fn trades(&self, exchange_id: &str) -> Result<Stream<Trade>> {
        let exchange = self.directory.exchange_by_id(exchange_id).await?;
        if !exchange.socket {
            return Err(CoinCapError::Unsupported(format!(
                "exchange {exchange_id} has no trade socket"
            )));
        }

        let url = self.trades_url(exchange_id);
        info!("[subscribe] trades on {exchange_id}");
        Stream::open(&self.connector, &url).await
    }

    /// Subscribe to USD price updates for `asset_ids`, or for every asset
    /// when the list is empty.
    ///
    /// Ids are checked with one batch lookup. If fewer (or more) assets come
    /// back than were requested the call fails with `Validation`; the error
    /// does not say which id was unknown.
    pub async fn prices<S: AsRef<str> + Sync>(
        &self,
        asset_ids: &[S],
    ) -> Result<Stream<PriceSnapshot>> {
        if !asset_ids.is_empty() {
            let ids: Vec<String> = asset_ids.iter().map(|id| id.as_ref().to_string()).collect();
            let found = self.directory.assets_by_ids(&ids).await?;
            debug!("[subscribe] {} of {} asset ids found", found.len(), ids.len());
            if found.len() != ids.len() {
                return Err(CoinCapError::Validation(format!(
                    "requested {} assets but {} exist",
                    ids.len(),
                    found.len()
                )));
            }
        }

        let url = self.prices_url(asset_ids);
        if asset_ids.is_empty() {
            info!("[subscribe] prices for all assets");
        } else {
            info!("[subscribe] prices for {} assets", asset_ids.len());
        }
        Stream::open_with(&self.connector, &url, decode_price_snapshot).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use async_trait::async_trait;
    use coincap_core::{Asset, Direction, Exchange, Timestamp};
    use tokio::time::timeout;

    use super::*;
    use crate::testing::ScriptedConnector;

    const WAIT: Duration = Duration::from_secs(5);

    struct FakeDirectory {
        exchanges: HashMap<String, Exchange>,
        assets: Vec<Asset>,
    }

    #[async_trait]
    impl Directory for FakeDirectory {
        async fn exchange_by_id(&self, id: &str) -> Result<Exchange> {
            self.exchanges
                .get(id)
                .cloned()
                .ok_or_else(|| CoinCapError::NotFound(format!("exchanges/{id}")))
        }

        async fn assets_by_ids(&self, ids: &[String]) -> Result<Vec<Asset>> {
            Ok(self.assets.iter().filter(|a| ids.contains(&a.id)).cloned().collect())
        }
    }

    fn exchange(id: &str, socket: bool) -> Exchange {
        Exchange {
            id: id.to_string(),
            name: id.to_uppercase(),
            rank: 1,
            percent_total_volume: None,
            volume_usd: None,
            trading_pairs: None,
            socket,
            url: None,
            updated: Timestamp(0),
        }
    }

    fn asset(id: &str) -> Asset {
        Asset {
            id: id.to_string(),
            rank: 1,
            symbol: id[..3].to_uppercase(),
            name: id.to_string(),
            supply: 1.0,
            max_supply: None,
            market_cap_usd: None,
            volume_usd_24hr: None,
            price_usd: 1.0,
            change_percent_24hr: None,
            vwap_24hr: None,
        }
    }

    fn client() -> (StreamClient<FakeDirectory, ScriptedConnector>, crate::testing::Script) {
        let directory = FakeDirectory {
            exchanges: [("binance", true), ("bitstamp", false)]
                .into_iter()
                .map(|(id, socket)| (id.to_string(), exchange(id, socket)))
                .collect(),
            assets: vec![asset("bitcoin"), asset("ethereum")],
        };
        let (connector, script) = ScriptedConnector::new();
        (StreamClient::with_parts(directory, connector, "wss://ws.test/"), script)
    }

    #[tokio::test]
    async fn unknown_exchange_is_not_found() {
        let (client, _script) = client();
        let err = client.trades("unknown-exchange").await.err().unwrap();
        assert!(matches!(err, CoinCapError::NotFound(_)));
        assert!(client.connector.opened().is_empty());
    }

    #[tokio::test]
    async fn exchange_without_socket_is_unsupported() {
        let (client, _script) = client();
        let err = client.trades("bitstamp").await.err().unwrap();
        assert!(matches!(err, CoinCapError::Unsupported(_)));
        assert!(client.connector.opened().is_empty());
    }

    #[tokio::test]
    async fn bogus_asset_fails_validation() {
        let (client, _script) = client();
        let err = client.prices(&["bitcoin", "bogus-asset-id"]).await.err().unwrap();
        assert!(matches!(err, CoinCapError::Validation(_)));
        assert!(client.connector.opened().is_empty());
    }

    #[tokio::test]
    async fn trades_stream_decodes_trades() {
        let (client, script) = client();
        let mut stream = client.trades("binance").await.unwrap();
        assert_eq!(client.connector.opened(), vec!["wss://ws.test/trades/binance".to_string()]);

        // Queue more than the consumer takes so close() finds the pump at a
        // delivery point rather than parked in a read.
        let json = r#"{"exchange":"binance","base":"bitcoin","quote":"tether","direction":"buy","price":64000.1,"volume":0.5,"timestamp":1700000000000,"priceUsd":64010.2}"#;
        for _ in 0..3 {
            script.send(Ok(json.as_bytes().to_vec())).unwrap();
        }

        let trade = timeout(WAIT, stream.next()).await.unwrap().unwrap();
        assert_eq!(trade.direction, Direction::Buy);
        assert_eq!(trade.quote, "tether");
        timeout(WAIT, stream.close()).await.unwrap();
        assert_eq!(stream.last_error(), None);
    }

    #[tokio::test]
    async fn no_assets_subscribes_to_all() {
        let (client, script) = client();
        let mut stream = client.prices::<&str>(&[]).await.unwrap();
        assert_eq!(client.connector.opened(), vec!["wss://ws.test/prices?assets=ALL".to_string()]);

        for _ in 0..3 {
            script.send(Ok(br#"{"bitcoin":"6929.82","tether":1}"#.to_vec())).unwrap();
        }
        let snapshot = timeout(WAIT, stream.next()).await.unwrap().unwrap();
        assert_eq!(snapshot["bitcoin"], 6929.82);
        assert_eq!(snapshot["tether"], 1.0);

        timeout(WAIT, stream.close()).await.unwrap();
        assert_eq!(client.connector.close_count(), 1);
    }

    #[tokio::test]
    async fn known_assets_compose_url() {
        let (client, script) = client();
        let mut stream = client.prices(&["bitcoin", "ethereum"]).await.unwrap();
        assert_eq!(
            client.connector.opened(),
            vec!["wss://ws.test/prices?assets=bitcoin,ethereum".to_string()]
        );
        for _ in 0..2 {
            script.send(Ok(br#"{"bitcoin":1,"ethereum":2}"#.to_vec())).unwrap();
        }
        timeout(WAIT, stream.close()).await.unwrap();
        assert_eq!(stream.last_error(), None);
    }
}
