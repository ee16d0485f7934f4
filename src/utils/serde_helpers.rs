//! Lenient field decoding for explorer payloads.
//!
//! Explorers are inconsistent about quoting numbers: the same field arrives as
//! `"123"` from one endpoint and `123` from another.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept a JSON string or number as text; `null` and missing become `None`
pub fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Accept a JSON string or number holding a non-negative integer
pub fn opt_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_string_or_number(deserializer)?.and_then(|s| s.parse().ok()))
}

/// Accept a JSON string or number holding a signed integer
pub fn opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_string_or_number(deserializer)?.and_then(|s| s.parse().ok()))
}

/// Accept a JSON string or number holding a decimal count
pub fn opt_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_string_or_number(deserializer)?.and_then(|s| s.parse().ok()))
}
