//! # coincap-core
//!
//! Core crate for the CoinCap client, providing:
//!
//! - **Types** (`types`): REST resources, stream payloads, request shapes
//! - **Deserializers** (`de`): string-or-number numeric decoding
//! - **Time** (`time`): timestamps, intervals and time-span validation
//! - **Parameters** (`params`): limit/offset trimming
//! - **Configuration** (`config`): JSON config deserialization
//! - **Error types** (`error`): domain-specific `CoinCapError` via thiserror
//! - **Logging** (`logging`): tracing-based structured logging

pub mod config;
pub mod de;
pub mod error;
pub mod logging;
pub mod params;
pub mod time;
pub mod types;

pub use error::{CoinCapError, Result};
pub use params::TrimParams;
pub use time::{Interval, IntervalParams, TimeRange, Timestamp};
// Re-export types at crate root for convenience.
pub use types::*;
