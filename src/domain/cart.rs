//! Persisted cart entries
//!
//! The cart lives in local storage as a JSON array written by several parts
//! of the storefront, so reading it is lenient: anything that is not an array
//! is an empty cart, and an entry whose quantity is not numeric counts as 0.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

use crate::domain::product::Product;

/// One line of the persisted cart: a product snapshot plus a quantity.
///
/// Keys this type does not model are kept in `extra` so rewriting the cart
/// does not drop fields written elsewhere in the storefront.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartEntry {
    #[serde(default, deserialize_with = "lenient_id")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub uri: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub image: Option<String>,
    /// Unit price at the time the product was added
    #[serde(default, deserialize_with = "lenient_price")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub quantity: u32,
    #[serde(flatten)]
    #[ts(skip)]
    pub extra: Map<String, Value>,
}

impl CartEntry {
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: Some(product.id),
            uri: Some(product.uri.clone()),
            title: Some(product.title.clone()),
            image: Some(product.image.clone()),
            price: Some(product.effective_price()),
            quantity,
            extra: Map::new(),
        }
    }

    /// Best-effort decoding of a single stored entry. Mistyped snapshot
    /// fields decode as absent; the id and quantity survive either way.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        Some(serde_json::from_value::<Self>(value.clone()).unwrap_or_else(|_| Self {
            id: object.get("id").and_then(coerce_id),
            quantity: object.get("quantity").map_or(0, coerce_quantity),
            ..Self::default()
        }))
    }

    pub fn line_total(&self) -> f64 {
        self.price.unwrap_or(0.0) * f64::from(self.quantity)
    }
}

/// Parses the raw storage value into entries.
///
/// `None` and non-array documents yield an empty cart, non-object array items
/// are dropped. Invalid JSON is returned as an error for the storage layer to absorb.
pub fn parse_cart(raw: Option<&str>) -> Result<Vec<CartEntry>, serde_json::Error> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    let document: Value = serde_json::from_str(raw)?;
    Ok(match document {
        Value::Array(items) => items.iter().filter_map(CartEntry::from_value).collect(),
        _ => Vec::new(),
    })
}

/// Sum of quantities across all entries.
pub fn total_quantity(entries: &[CartEntry]) -> u64 {
    entries.iter().map(|entry| u64::from(entry.quantity)).sum()
}

/// Loose numeric coercion for quantities: non-negative integers pass through,
/// finite floats and numeric strings are truncated, everything else is 0.
pub fn coerce_quantity(value: &Value) -> u32 {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match number {
        Some(n) if n.is_finite() && n > 0.0 => {
            if n >= f64::from(u32::MAX) {
                u32::MAX
            } else {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let truncated = n.trunc() as u32;
                truncated
            }
        }
        _ => 0,
    }
}

fn lenient_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map_or(0, coerce_quantity))
}

fn coerce_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_id))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn lenient_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let price: Option<f64> = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(price.filter(|p| p.is_finite()))
}
