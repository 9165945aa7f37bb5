//! Serde helpers for `U256` values carried as decimal strings.
//!
//! Token amounts routinely exceed `u64`, so they are written as decimal
//! strings. Reading accepts decimal strings, `0x`-prefixed hex strings, and
//! plain JSON integers.

use alloy_primitives::U256;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serializer};
use std::fmt;

/// Parse a decimal or `0x`-prefixed hex string into a `U256`.
pub fn parse_u256(s: &str) -> Result<U256, String> {
    let (digits, radix) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (s, 10),
    };
    if digits.is_empty() {
        return Err(format!("empty integer literal '{s}'"));
    }
    // `from_str_radix` skips underscores; decoders never emit them.
    if digits.contains('_') {
        return Err(format!("invalid integer '{s}': digit separators are not allowed"));
    }
    U256::from_str_radix(digits, radix).map_err(|e| format!("invalid integer '{s}': {e}"))
}

struct Decimal(U256);

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DecimalVisitor)
    }
}

struct DecimalVisitor;

impl<'de> Visitor<'de> for DecimalVisitor {
    type Value = Decimal;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an unsigned integer as a decimal string, 0x-hex string, or number")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Decimal, E> {
        Ok(Decimal(U256::from(v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Decimal, E> {
        parse_u256(v).map(Decimal).map_err(E::custom)
    }
}

/// `#[serde(with = "crate::serde_uint::decimal")]` for a single `U256`.
pub mod decimal {
    use super::*;

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        Decimal::deserialize(deserializer).map(|d| d.0)
    }
}

/// `#[serde(with = "crate::serde_uint::decimal_seq")]` for a `Vec<U256>`.
pub mod decimal_seq {
    use super::*;

    pub fn serialize<S: Serializer>(values: &[U256], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(|v| v.to_string()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<U256>, D::Error> {
        let items = Vec::<Decimal>::deserialize(deserializer)?;
        Ok(items.into_iter().map(|d| d.0).collect())
    }
}
