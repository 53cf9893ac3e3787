//! Lenient serde helpers for form-style and upstream payloads.
//!
//! Dashboard forms post numbers as strings and the personnel directory is not
//! consistent about string vs numeric identifiers, so these accept both.

use serde::de::{self, Deserializer};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Integer from a JSON number or a numeric string.
pub fn int<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Loose::deserialize(deserializer)? {
        Loose::Int(n) => n,
        Loose::Float(f) if f.fract() == 0.0 => f as i64,
        Loose::Float(f) => return Err(de::Error::custom(format!("expected an integer, got {f}"))),
        Loose::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| de::Error::custom(format!("expected an integer, got '{s}'")))?,
    };

    i32::try_from(value).map_err(|_| de::Error::custom(format!("integer out of range: {value}")))
}

/// Decimal from a JSON number or a numeric string.
pub fn decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Loose::deserialize(deserializer)? {
        Loose::Int(n) => Ok(n as f64),
        Loose::Float(f) => Ok(f),
        Loose::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("expected a number, got '{s}'"))),
    }
}

/// Optional string that may arrive as a number.
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Loose>::deserialize(deserializer)? {
        None => None,
        Some(Loose::Int(n)) => Some(n.to_string()),
        Some(Loose::Float(f)) => Some(f.to_string()),
        Some(Loose::Text(s)) if s.trim().is_empty() => None,
        Some(Loose::Text(s)) => Some(s),
    })
}

/// Optional integer that may arrive as a numeric string.
pub fn opt_int<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Loose>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Loose::Int(n)) => i32::try_from(n)
            .map(Some)
            .map_err(|_| de::Error::custom(format!("integer out of range: {n}"))),
        Some(Loose::Float(f)) if f.fract() == 0.0 => Ok(Some(f as i32)),
        Some(Loose::Float(f)) => Err(de::Error::custom(format!("expected an integer, got {f}"))),
        Some(Loose::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Loose::Text(s)) => s
            .trim()
            .parse::<i32>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("expected an integer, got '{s}'"))),
    }
}
