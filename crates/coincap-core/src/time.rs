//! Timestamps, intervals and time-span validation.
//!
//! CoinCap expresses every instant as UNIX **milliseconds**. Historical
//! endpoints take an interval code (`h1`, `m5`, ...) plus an optional
//! `start`/`end` pair, which is validated locally before any request is made.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoinCapError, Result};

// ---------------------------------------------------------------------------
// Timestamp
// ---------------------------------------------------------------------------

/// UNIX time in milliseconds, as sent by the API.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp_millis())
    }

    pub fn as_millis(self) -> i64 {
        self.0
    }

    /// Convert to a UTC instant. `None` if the value is out of chrono's range.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_datetime(dt)
    }
}

// ---------------------------------------------------------------------------
// Interval
// ---------------------------------------------------------------------------

/// Point-in-time interval for historical market data.
///
/// The first nine variants are accepted by every historical endpoint. The
/// last three are "extended" and only accepted by the candles endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[repr(u8)]
pub enum Interval {
    #[default]
    Hour = 0,
    Minute = 1,
    FiveMinutes = 2,
    FifteenMinutes = 3,
    ThirtyMinutes = 4,
    TwoHours = 5,
    SixHours = 6,
    TwelveHours = 7,
    Day = 8,
    FourHours = 9,
    EightHours = 10,
    Week = 11,
}

impl Interval {
    /// Every interval, in discriminant order.
    pub const ALL: [Interval; 12] = [
        Self::Hour,
        Self::Minute,
        Self::FiveMinutes,
        Self::FifteenMinutes,
        Self::ThirtyMinutes,
        Self::TwoHours,
        Self::SixHours,
        Self::TwelveHours,
        Self::Day,
        Self::FourHours,
        Self::EightHours,
        Self::Week,
    ];

    /// Wire code used in the `interval` query parameter.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Hour => "h1",
            Self::Minute => "m1",
            Self::FiveMinutes => "m5",
            Self::FifteenMinutes => "m15",
            Self::ThirtyMinutes => "m30",
            Self::TwoHours => "h2",
            Self::SixHours => "h6",
            Self::TwelveHours => "h12",
            Self::Day => "d1",
            Self::FourHours => "h4",
            Self::EightHours => "h8",
            Self::Week => "w1",
        }
    }

    pub fn duration(self) -> TimeDelta {
        match self {
            Self::Hour => TimeDelta::hours(1),
            Self::Minute => TimeDelta::minutes(1),
            Self::FiveMinutes => TimeDelta::minutes(5),
            Self::FifteenMinutes => TimeDelta::minutes(15),
            Self::ThirtyMinutes => TimeDelta::minutes(30),
            Self::TwoHours => TimeDelta::hours(2),
            Self::SixHours => TimeDelta::hours(6),
            Self::TwelveHours => TimeDelta::hours(12),
            Self::Day => TimeDelta::days(1),
            Self::FourHours => TimeDelta::hours(4),
            Self::EightHours => TimeDelta::hours(8),
            Self::Week => TimeDelta::weeks(1),
        }
    }

    /// Extended intervals are only valid for candle queries.
    pub const fn is_extended(self) -> bool {
        matches!(self, Self::FourHours | Self::EightHours | Self::Week)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<u8> for Interval {
    type Error = CoinCapError;

    fn try_from(v: u8) -> Result<Self> {
        Self::ALL
            .get(v as usize)
            .copied()
            .ok_or_else(|| CoinCapError::InvalidInterval(format!("no interval with index {v}")))
    }
}

impl FromStr for Interval {
    type Err = CoinCapError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|i| i.code() == s)
            .ok_or_else(|| CoinCapError::InvalidInterval(format!("unknown interval code {s:?}")))
    }
}

impl TryFrom<String> for Interval {
    type Error = CoinCapError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Interval> for String {
    fn from(i: Interval) -> Self {
        i.code().to_string()
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// A validated `[start, end]` span in API milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: Timestamp,
    pub end: Timestamp,
}

/// Check an interval and optional time span against the API's rules.
///
/// `now` is passed in so the check stays a pure function. Returns the span
/// to send, or `None` when neither bound is set.
pub fn validate(
    interval: Interval,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    allow_extended: bool,
    now: DateTime<Utc>,
) -> Result<Option<TimeRange>> {
    if interval.is_extended() && !allow_extended {
        return Err(CoinCapError::InvalidInterval(format!(
            "{interval} is only available for candles"
        )));
    }

    let (start, end) = match (start, end) {
        (None, None) => return Ok(None),
        (Some(s), Some(e)) => (s, e),
        (Some(_), None) => {
            return Err(CoinCapError::InvalidTimeSpan("start given without end".into()));
        }
        (None, Some(_)) => {
            return Err(CoinCapError::InvalidTimeSpan("end given without start".into()));
        }
    };

    if end < start {
        return Err(CoinCapError::InvalidTimeSpan("end is before start".into()));
    }
    if end > now {
        return Err(CoinCapError::InvalidTimeSpan("end is in the future".into()));
    }

    let span = end - start;
    if span < interval.duration() {
        return Err(CoinCapError::IntervalTooCoarse {
            interval: interval.code(),
            span_ms: span.num_milliseconds(),
        });
    }

    Ok(Some(TimeRange { start: start.into(), end: end.into() }))
}

/// Interval and optional time span for a historical query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntervalParams {
    pub interval: Interval,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl IntervalParams {
    pub fn new(interval: Interval) -> Self {
        Self { interval, start: None, end: None }
    }

    pub fn with_span(interval: Interval, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { interval, start: Some(start), end: Some(end) }
    }

    pub fn validate(&self, allow_extended: bool, now: DateTime<Utc>) -> Result<Option<TimeRange>> {
        validate(self.interval, self.start, self.end, allow_extended, now)
    }
}

/// Build the `interval`/`start`/`end` query pairs for a request.
///
/// Missing params mean the API default: `h1` with no span.
pub fn interval_query(
    params: Option<&IntervalParams>,
    allow_extended: bool,
) -> Result<Vec<(&'static str, String)>> {
    let Some(p) = params else {
        return Ok(vec![("interval", Interval::Hour.code().to_string())]);
    };

    let range = p.validate(allow_extended, Utc::now())?;
    let mut query = vec![("interval", p.interval.code().to_string())];
    if let Some(r) = range {
        query.push(("start", r.start.to_string()));
        query.push(("end", r.end.to_string()));
    }
    Ok(query)
}
