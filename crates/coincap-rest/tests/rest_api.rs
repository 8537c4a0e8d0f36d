//! REST client tests against a local mock API.

use chrono::{TimeDelta, Utc};
use coincap_core::{
    CandlesRequest, CoinCapError, Interval, IntervalParams, MarketsRequest, Timestamp, TrimParams,
};
use coincap_rest::{Client, Directory};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BITCOIN: &str = r#"{"id":"bitcoin","rank":"1","symbol":"BTC","name":"Bitcoin","supply":"19000000","maxSupply":"21000000","marketCapUsd":"1","volumeUsd24Hr":"1","priceUsd":"64000.5","changePercent24Hr":"1.2","vwap24Hr":"63900"}"#;
const ETHEREUM: &str = r#"{"id":"ethereum","rank":"2","symbol":"ETH","name":"Ethereum","supply":"120000000","maxSupply":null,"marketCapUsd":"1","volumeUsd24Hr":"1","priceUsd":"3100.25","changePercent24Hr":"-0.4","vwap24Hr":null}"#;
const EMPTY: &str = r#"{"data":[],"timestamp":1}"#;

/// Mock server plus a client pointed at its `/v2` root.
async fn api() -> (MockServer, Client) {
    let server = MockServer::start().await;
    let client = Client::with_base_url(format!("{}/v2", server.uri()));
    (server, client)
}

fn json(status: u16, body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_raw(body.into(), "application/json")
}

/// `path?query` of every request the server saw, in order.
async fn targets(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| match r.url.query() {
            Some(q) => format!("{}?{q}", r.url.path()),
            None => r.url.path().to_string(),
        })
        .collect()
}

#[tokio::test]
async fn assets_by_ids_sends_comma_joined_ids() {
    let (server, client) = api().await;
    Mock::given(method("GET"))
        .and(path("/v2/assets"))
        .and(query_param("ids", "bitcoin,ethereum"))
        .respond_with(json(200, format!(r#"{{"data":[{BITCOIN},{ETHEREUM}],"timestamp":1700000000000}}"#)))
        .expect(1)
        .mount(&server)
        .await;

    let ids = vec!["bitcoin".to_string(), "ethereum".to_string()];
    let (assets, ts) = client.assets_by_ids(&ids).await.unwrap();
    assert_eq!(assets.len(), 2);
    assert_eq!(assets[1].max_supply, None);
    assert_eq!(ts, Timestamp(1_700_000_000_000));
    assert_eq!(targets(&server).await, ["/v2/assets?ids=bitcoin%2Cethereum"]);
}

#[tokio::test]
async fn empty_id_list_makes_no_request() {
    let (server, client) = api().await;
    let (assets, _) = client.assets_by_ids(&[]).await.unwrap();
    assert!(assets.is_empty());
    assert!(targets(&server).await.is_empty());
}

#[tokio::test]
async fn exchange_lookup_and_not_found() {
    let (server, client) = api().await;
    Mock::given(method("GET"))
        .and(path("/v2/exchanges/binance"))
        .respond_with(json(
            200,
            r#"{"data":{"exchangeId":"binance","name":"Binance","rank":"1","percentTotalVolume":"20","volumeUsd":"1","tradingPairs":"900","socket":true,"exchangeUrl":"https://binance.com","updated":1},"timestamp":2}"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/exchanges/zxcvzxvzv"))
        .respond_with(json(404, r#"{"error":"not found"}"#))
        .mount(&server)
        .await;

    let exchange = Directory::exchange_by_id(&client, "binance").await.unwrap();
    assert!(exchange.socket);

    let err = client.exchange_by_id("zxcvzxvzv").await.unwrap_err();
    assert!(matches!(err, CoinCapError::NotFound(_)));
}

#[tokio::test]
async fn exchange_list_tolerates_null_socket() {
    let (server, client) = api().await;
    Mock::given(method("GET"))
        .and(path("/v2/exchanges"))
        .respond_with(json(
            200,
            r#"{"data":[
                {"exchangeId":"binance","name":"Binance","rank":"1","socket":true,"updated":1},
                {"exchangeId":"quoine","name":"Quoine","rank":"40","socket":null,"updated":1}
            ],"timestamp":2}"#,
        ))
        .mount(&server)
        .await;

    let (exchanges, _) = client.exchanges().await.unwrap();
    let sockets: Vec<bool> = exchanges.iter().map(|e| e.socket).collect();
    assert_eq!(sockets, [true, false]);
}

#[tokio::test]
async fn server_errors_surface_status() {
    let (server, client) = api().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = client.rates().await.unwrap_err();
    assert_eq!(err, CoinCapError::Api { status: 502, body: "bad gateway".into() });
}

#[tokio::test]
async fn search_and_markets_carry_trim_params() {
    let (server, client) = api().await;
    Mock::given(method("GET")).respond_with(json(200, EMPTY)).mount(&server).await;

    client.assets_search("bit", Some(&TrimParams::new(9000, 5))).await.unwrap();
    let req = MarketsRequest { exchange_id: "poloniex".into(), ..Default::default() };
    client.markets(&req, Some(&TrimParams::new(10, 0))).await.unwrap();

    assert_eq!(
        targets(&server).await,
        [
            "/v2/assets?search=bit&limit=2000&offset=5",
            "/v2/markets?exchange=poloniex&limit=10&offset=0",
        ]
    );
}

#[tokio::test]
async fn history_rejects_extended_interval_before_request() {
    let (server, client) = api().await;
    Mock::given(method("GET"))
        .and(path("/v2/assets/bitcoin/history"))
        .and(query_param("interval", "h1"))
        .respond_with(json(200, EMPTY))
        .expect(1)
        .mount(&server)
        .await;

    let err = client
        .asset_history("bitcoin", Some(&IntervalParams::new(Interval::Week)))
        .await
        .unwrap_err();
    assert!(matches!(err, CoinCapError::InvalidInterval(_)));
    assert!(targets(&server).await.is_empty());

    client.asset_history("bitcoin", None).await.unwrap();
}

#[tokio::test]
async fn candles_validate_then_query() {
    let (server, client) = api().await;
    Mock::given(method("GET"))
        .and(path("/v2/candles"))
        .and(query_param("exchange", "poloniex"))
        .and(query_param("interval", "h8"))
        .respond_with(json(
            200,
            r#"{"data":[{"open":"1","high":"2","low":"0.5","close":"1.5","volume":"10","period":1528156800000}],"timestamp":1}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.candles(&CandlesRequest::new("poloniex", "ethereum", ""), None, None).await;
    assert_eq!(err.unwrap_err(), CoinCapError::MissingParam("QuoteID"));
    assert!(targets(&server).await.is_empty());

    let end = Utc::now() - TimeDelta::minutes(1);
    let span = IntervalParams::with_span(Interval::EightHours, end - TimeDelta::days(2), end);
    let (candles, _) = client
        .candles(&CandlesRequest::new("poloniex", "ethereum", "bitcoin"), Some(&span), None)
        .await
        .unwrap();
    assert_eq!(candles.len(), 1);

    let seen = targets(&server).await;
    assert!(seen[0].starts_with(
        "/v2/candles?exchange=poloniex&baseId=ethereum&quoteId=bitcoin&interval=h8&start="
    ));
}
