//! `/markets` endpoint.

use coincap_core::{Market, MarketsRequest, Result, Timestamp, TrimParams};

use crate::client::Client;

impl Client {
    /// Markets matching every non-empty filter in `request`.
    pub async fn markets(
        &self,
        request: &MarketsRequest,
        trim: Option<&TrimParams>,
    ) -> Result<(Vec<Market>, Timestamp)> {
        let mut query = request.query();
        TrimParams::append_to(trim, &mut query);
        self.get("markets", &query).await
    }
}
