//! Serde helpers for CoinCap's numeric encoding.
//!
//! The REST API sends almost every number as a JSON string (`"6929.82"`),
//! while the WebSocket feeds mix quoted and bare numbers. The functions here
//! are meant for `#[serde(deserialize_with = "...")]` so that public structs
//! keep plain `f64`/`u64` fields.

use std::collections::HashMap;
use std::fmt;

use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::Deserialize;

struct F64Visitor;

impl Visitor<'_> for F64Visitor {
    type Value = f64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number or a numeric string")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
        if !v.is_finite() {
            return Err(E::invalid_value(Unexpected::Float(v), &self));
        }
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
        Ok(v as f64)
    }

    // fast_float2 also accepts "nan" and "inf", which JSON cannot carry.
    fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
        match fast_float2::parse::<f64, _>(v.trim()) {
            Ok(n) if n.is_finite() => Ok(n),
            _ => Err(E::invalid_value(Unexpected::Str(v), &self)),
        }
    }
}

struct U64Visitor;

impl Visitor<'_> for U64Visitor {
    type Value = u64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a non-negative integer or an integer string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<u64, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<u64, E> {
        u64::try_from(v).map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<u64, E> {
        v.trim().parse().map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
    }
}

/// Decode an `f64` from either `"1.5"` or `1.5`.
pub fn f64_str_or_num<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    d.deserialize_any(F64Visitor)
}

/// Decode a `u64` from either `"42"` or `42`.
pub fn u64_str_or_num<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    d.deserialize_any(U64Visitor)
}

#[derive(Deserialize)]
struct LenientF64(#[serde(deserialize_with = "f64_str_or_num")] f64);

/// Like [`f64_str_or_num`], but `null` decodes to `None`.
///
/// Pair with `#[serde(default)]` so a missing field is also `None`.
pub fn opt_f64_str_or_num<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(Option::<LenientF64>::deserialize(d)?.map(|n| n.0))
}

#[derive(Deserialize)]
struct LenientU64(#[serde(deserialize_with = "u64_str_or_num")] u64);

/// Like [`u64_str_or_num`], but `null` decodes to `None`.
pub fn opt_u64_str_or_num<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    Ok(Option::<LenientU64>::deserialize(d)?.map(|n| n.0))
}

/// Decode a `bool` where `null` means `false`.
pub fn bool_or_null<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(d)?.unwrap_or(false))
}

/// Decode a JSON object whose values are quoted or bare numbers.
pub fn map_f64_str_or_num<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<HashMap<String, f64>, D::Error> {
    let raw = HashMap::<String, LenientF64>::deserialize(d)?;
    Ok(raw.into_iter().map(|(k, v)| (k, v.0)).collect())
}
