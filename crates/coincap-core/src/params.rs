//! Result-set trimming shared by the list endpoints.

/// Largest page the API will return.
pub const MAX_LIMIT: u32 = 2000;

/// `limit`/`offset` parameters for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrimParams {
    /// Maximum number of results; `0` leaves the API default in place.
    pub limit: u32,
    /// Skip the first N entries of the result set.
    pub offset: u32,
}

impl TrimParams {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }

    /// Limit after clamping to [`MAX_LIMIT`].
    pub fn effective_limit(&self) -> u32 {
        self.limit.min(MAX_LIMIT)
    }

    /// Append `limit` (when non-zero) and `offset` to a query.
    pub fn append_to(params: Option<&Self>, query: &mut Vec<(&'static str, String)>) {
        let Some(p) = params else { return };
        if p.limit != 0 {
            query.push(("limit", p.effective_limit().to_string()));
        }
        query.push(("offset", p.offset.to_string()));
    }
}
