//! `/candles` endpoint.

use coincap_core::time::interval_query;
use coincap_core::{Candle, CandlesRequest, IntervalParams, Result, Timestamp, TrimParams};

use crate::client::Client;

impl Client {
    /// OHLCV candles for one market.
    ///
    /// Exchange, base and quote ids are checked before any request is sent.
    /// Unlike asset history, the extended intervals are accepted here.
    pub async fn candles(
        &self,
        request: &CandlesRequest,
        interval: Option<&IntervalParams>,
        trim: Option<&TrimParams>,
    ) -> Result<(Vec<Candle>, Timestamp)> {
        let mut query = request.query()?;
        query.extend(interval_query(interval, true)?);
        TrimParams::append_to(trim, &mut query);
        self.get("candles", &query).await
    }
}
