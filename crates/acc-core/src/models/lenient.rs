//! Lenient numeric decoding.
//!
//! Cost endpoints return monetary values as numbers in some payloads and as
//! strings (`"1250.00"`) in others.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Deserialize a number or numeric string into `Option<f64>`. Anything else
/// (null, empty string, garbage) becomes `None`.
pub fn amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(to_f64))
}

pub fn to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s
                .trim()
                .chars()
                .filter(|c| *c != ',' && *c != '$')
                .collect();
            cleaned.parse().ok()
        }
        _ => None,
    }
}

/// Keys that carry a monetary total, in the order they are trusted.
const AMOUNT_KEYS: &[&str] = &[
    "amount",
    "totalAmount",
    "value",
    "cost",
    "price",
    "unitCost",
    "lineTotal",
    "extendedAmount",
];

/// Find the first non-zero amount among the known keys, looking at the
/// record itself and then at a nested `attributes` object.
pub fn best_amount(primary: Option<f64>, extra: &Map<String, Value>) -> Option<f64> {
    if let Some(amount) = primary.filter(|a| *a != 0.0) {
        return Some(amount);
    }

    let nested = extra.get("attributes").and_then(Value::as_object);
    AMOUNT_KEYS
        .iter()
        .flat_map(|key| [extra.get(*key), nested.and_then(|attrs| attrs.get(*key))])
        .flatten()
        .filter_map(to_f64)
        .find(|a| *a != 0.0)
        .or(primary)
}
