//! `/assets` endpoints.

use coincap_core::time::interval_query;
use coincap_core::{Asset, AssetHistory, AssetMarket, IntervalParams, Result, Timestamp, TrimParams};

use crate::client::{Client, Query, segment};

impl Client {
    /// All assets, in rank order (API default page).
    pub async fn assets(&self) -> Result<(Vec<Asset>, Timestamp)> {
        self.assets_search("", None).await
    }

    /// Assets whose symbol or id matches `search`, optionally trimmed.
    pub async fn assets_search(
        &self,
        search: &str,
        trim: Option<&TrimParams>,
    ) -> Result<(Vec<Asset>, Timestamp)> {
        let mut query = Query::new();
        if !search.is_empty() {
            query.push(("search", search.to_string()));
        }
        TrimParams::append_to(trim, &mut query);
        self.get("assets", &query).await
    }

    /// Assets with the given ids. An empty id list returns an empty list
    /// without a request. Unknown ids are silently absent from the result.
    pub async fn assets_by_ids(&self, ids: &[String]) -> Result<(Vec<Asset>, Timestamp)> {
        if ids.is_empty() {
            return Ok((Vec::new(), Timestamp::default()));
        }
        let query = vec![("ids", ids.join(","))];
        self.get("assets", &query).await
    }

    pub async fn asset_by_id(&self, id: &str) -> Result<(Asset, Timestamp)> {
        self.get(&format!("assets/{}", segment(id)), &[]).await
    }

    /// USD price history. Extended intervals (4h, 8h, 1w) are rejected.
    pub async fn asset_history(
        &self,
        id: &str,
        interval: Option<&IntervalParams>,
    ) -> Result<(Vec<AssetHistory>, Timestamp)> {
        let query = interval_query(interval, false)?;
        self.get(&format!("assets/{}/history", segment(id)), &query).await
    }

    /// Markets the asset trades on.
    pub async fn asset_markets(
        &self,
        id: &str,
        trim: Option<&TrimParams>,
    ) -> Result<(Vec<AssetMarket>, Timestamp)> {
        let mut query = Query::new();
        TrimParams::append_to(trim, &mut query);
        self.get(&format!("assets/{}/markets", segment(id)), &query).await
    }
}
