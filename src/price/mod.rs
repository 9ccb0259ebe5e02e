//! Marketplace stats normalization
//!
//! The Discogs marketplace stats payload is loosely shaped: `lowest_price`
//! arrives either as a bare number, a numeric string, or a money object like
//! `{"value": 12.34, "currency": "USD"}`. One untagged union plus one
//! normalization function absorbs all of it; everything here is total and
//! returns value-or-absent, never panics.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;

/// The two wire shapes of `lowest_price`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawLowestPrice {
    /// Money object carrying the amount under `value`
    Money { value: Value },
    /// Bare scalar (number or numeric string)
    Scalar(Value),
}

/// Extracts the lowest listed price from a marketplace stats payload
///
/// Returns the price exactly as sent, without rounding, so callers choose
/// their own precision. Absent payload, absent or null `lowest_price`, and
/// unparseable values all yield `None`.
pub fn extract_lowest_price(stats: Option<&Value>) -> Option<Decimal> {
    let lowest = stats?.get("lowest_price")?;
    if lowest.is_null() {
        return None;
    }

    match serde_json::from_value::<RawLowestPrice>(lowest.clone()).ok()? {
        RawLowestPrice::Money { value } => as_decimal(&value),
        RawLowestPrice::Scalar(value) => as_decimal(&value),
    }
}

/// Extracts the current sell count from a marketplace stats payload
pub fn extract_num_for_sale(stats: Option<&Value>) -> Option<u64> {
    stats?.get("num_for_sale")?.as_u64()
}

/// Parses a JSON scalar as an exact decimal
///
/// Numbers go through their shortest decimal rendering so 12.345 stays
/// 12.345 rather than its binary expansion; strings are trimmed and parsed
/// directly, with scientific notation accepted as a fallback.
fn as_decimal(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };

    Decimal::from_str(&text)
        .ok()
        .or_else(|| Decimal::from_scientific(&text).ok())
}
