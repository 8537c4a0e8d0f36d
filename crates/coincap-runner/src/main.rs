//! # coincap-runner
//!
//! Command-line front end for the CoinCap client.
//!
//! REST subcommands print one JSON object per line; `trades` and `prices`
//! follow the WebSocket feeds until `--count` values were printed, the feed
//! ends, or Ctrl+C is pressed.
//!
//! # Usage
//!
//! ```bash
//! coincap-runner assets --search btc --limit 5
//! coincap-runner history bitcoin --interval d1
//! coincap-runner candles binance ethereum bitcoin --interval h4
//! coincap-runner prices bitcoin ethereum --count 10
//! coincap-runner --config client.json trades binance
//! ```

use std::path::PathBuf;

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use coincap_core::config::{ClientConfig, load_config};
use coincap_core::logging::init_logging;
use coincap_core::{CandlesRequest, Interval, IntervalParams, MarketsRequest, Timestamp, TrimParams};
use coincap_rest::Client;
use coincap_stream::{Stream, StreamClient};
use serde::Serialize;
use tracing::{info, warn};

/// CoinCap market data from the command line.
#[derive(Parser)]
#[command(name = "coincap-runner", about = "CoinCap market data client")]
struct Cli {
    /// Configuration file path (JSON). Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error). Overrides the config.
    #[arg(short, long)]
    log_level: Option<String>,

    /// Optional log directory for file output. Overrides the config.
    #[arg(long)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List assets, optionally filtered by a search term.
    Assets {
        #[arg(long, default_value = "")]
        search: String,
        #[command(flatten)]
        page: Page,
    },
    /// Show one asset, or the markets it trades on.
    Asset {
        id: String,
        #[arg(long)]
        markets: bool,
        #[command(flatten)]
        page: Page,
    },
    /// USD price history of an asset.
    History {
        id: String,
        #[command(flatten)]
        span: Span,
    },
    /// Conversion rates, or a single rate.
    Rates { id: Option<String> },
    /// List exchanges.
    Exchanges,
    /// Show one exchange.
    Exchange { id: String },
    /// Markets matching the given filters.
    Markets {
        #[arg(long, default_value = "")]
        exchange: String,
        #[arg(long, default_value = "")]
        base_symbol: String,
        #[arg(long, default_value = "")]
        base_id: String,
        #[arg(long, default_value = "")]
        quote_symbol: String,
        #[arg(long, default_value = "")]
        quote_id: String,
        #[arg(long, default_value = "")]
        asset_symbol: String,
        #[arg(long, default_value = "")]
        asset_id: String,
        #[command(flatten)]
        page: Page,
    },
    /// OHLCV candles for one market.
    Candles {
        exchange: String,
        base_id: String,
        quote_id: String,
        #[command(flatten)]
        span: Span,
        #[command(flatten)]
        page: Page,
    },
    /// Follow live trades on an exchange.
    Trades {
        exchange: String,
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
    /// Follow live USD prices; no ids means every asset.
    Prices {
        assets: Vec<String>,
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
}

#[derive(Args)]
struct Page {
    /// Page size (0 = API default, capped at 2000).
    #[arg(long, default_value_t = 0)]
    limit: u32,
    #[arg(long, default_value_t = 0)]
    offset: u32,
}

impl Page {
    fn trim(&self) -> Option<TrimParams> {
        (self.limit > 0 || self.offset > 0).then(|| TrimParams::new(self.limit, self.offset))
    }
}

#[derive(Args)]
struct Span {
    /// Interval code: m1 m5 m15 m30 h1 h2 h4 h6 h8 h12 d1 w1.
    #[arg(short, long, default_value = "h1")]
    interval: Interval,
    /// Span start, RFC 3339.
    #[arg(long)]
    start: Option<DateTime<Utc>>,
    /// Span end, RFC 3339.
    #[arg(long)]
    end: Option<DateTime<Utc>>,
}

impl Span {
    fn params(&self) -> IntervalParams {
        IntervalParams { interval: self.interval, start: self.start, end: self.end }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load configuration, CLI flags win
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };
    if let Some(level) = &cli.log_level {
        config.log.level = level.clone();
    }
    if cli.log_dir.is_some() {
        config.log.dir = cli.log_dir.clone();
    }

    // 2. Initialize logging
    init_logging(&config.log, "coincap-runner")?;
    info!("coincap-runner starting, rest={}, ws={}", config.rest_url, config.ws_url);

    // 3. Run the command
    match cli.command {
        Command::Trades { exchange, count } => {
            let client = StreamClient::new(&config)?;
            follow(client.trades(&exchange).await?, count).await
        }
        Command::Prices { assets, count } => {
            let client = StreamClient::new(&config)?;
            follow(client.prices(assets.as_slice()).await?, count).await
        }
        command => run_rest(&Client::new(&config)?, command).await,
    }
}

async fn run_rest(client: &Client, command: Command) -> Result<()> {
    let stamp = match command {
        Command::Assets { search, page } => {
            let (assets, ts) = client.assets_search(&search, page.trim().as_ref()).await?;
            print_all(&assets)?;
            ts
        }
        Command::Asset { id, markets: false, .. } => {
            let (asset, ts) = client.asset_by_id(&id).await?;
            print(&asset)?;
            ts
        }
        Command::Asset { id, markets: true, page } => {
            let (markets, ts) = client.asset_markets(&id, page.trim().as_ref()).await?;
            print_all(&markets)?;
            ts
        }
        Command::History { id, span } => {
            let (history, ts) = client.asset_history(&id, Some(&span.params())).await?;
            print_all(&history)?;
            ts
        }
        Command::Rates { id: Some(id) } => {
            let (rate, ts) = client.rate_by_id(&id).await?;
            print(&rate)?;
            ts
        }
        Command::Rates { id: None } => {
            let (rates, ts) = client.rates().await?;
            print_all(&rates)?;
            ts
        }
        Command::Exchanges => {
            let (exchanges, ts) = client.exchanges().await?;
            print_all(&exchanges)?;
            ts
        }
        Command::Exchange { id } => {
            let (exchange, ts) = client.exchange_by_id(&id).await?;
            print(&exchange)?;
            ts
        }
        Command::Markets {
            exchange,
            base_symbol,
            base_id,
            quote_symbol,
            quote_id,
            asset_symbol,
            asset_id,
            page,
        } => {
            let request = MarketsRequest {
                exchange_id: exchange,
                base_symbol,
                base_id,
                quote_symbol,
                quote_id,
                asset_symbol,
                asset_id,
            };
            let (markets, ts) = client.markets(&request, page.trim().as_ref()).await?;
            print_all(&markets)?;
            ts
        }
        Command::Candles { exchange, base_id, quote_id, span, page } => {
            let request = CandlesRequest::new(exchange, base_id, quote_id);
            let (candles, ts) =
                client.candles(&request, Some(&span.params()), page.trim().as_ref()).await?;
            print_all(&candles)?;
            ts
        }
        Command::Trades { .. } | Command::Prices { .. } => bail!("not a REST command"),
    };

    info!("server time {}", stamp_display(stamp));
    Ok(())
}

/// Print values until `count` is reached, the feed ends, or Ctrl+C.
async fn follow<T: Serialize>(mut stream: Stream<T>, count: Option<usize>) -> Result<()> {
    info!("following {}", stream.label());
    let mut seen = 0usize;

    while count.is_none_or(|limit| seen < limit) {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
            value = stream.next() => match value {
                Some(value) => {
                    print(&value)?;
                    seen += 1;
                }
                None => break,
            }
        }
    }

    stream.close().await;
    if let Some(e) = stream.last_error() {
        warn!("{} ended after {seen} value(s): {e}", stream.label());
        return Err(e.into());
    }
    info!("{} closed after {seen} value(s)", stream.label());
    Ok(())
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

fn print_all<T: Serialize>(values: &[T]) -> Result<()> {
    values.iter().try_for_each(print)
}

fn stamp_display(ts: Timestamp) -> String {
    ts.to_datetime().map_or_else(|| ts.to_string(), |dt| dt.to_rfc3339())
}
