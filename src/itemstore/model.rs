//! # Domain Model: Items as Opaque JSON Records
//!
//! An item is not a struct. Callers hand the store arbitrary JSON objects,
//! and every field except two is opaque payload that must survive a
//! round-trip byte-for-byte in meaning (`serde_json` is built with
//! `preserve_order` so field order survives re-serialization too).
//!
//! The two fields the store actually reads:
//!
//! - `id`: string, compared by exact string equality. Uniqueness is a
//!   caller assumption; the store never enforces it.
//! - `productId`: integer, used only by the membership check.
//!
//! A missing or wrongly-typed field is never an error, it just doesn't
//! match. This keeps the store honest about being a dumb cache: it has no
//! schema and no opinion about payloads.

use serde_json::Value;

/// The single preference key holding the serialized item collection.
pub const STORAGE_KEY: &str = "saved_items";

/// Parse an item payload. Items must be JSON objects; anything else
/// (arrays, scalars, malformed input) is rejected.
pub fn parse_item(json: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(json) {
        Ok(value) if value.is_object() => Some(value),
        _ => None,
    }
}

/// Extract the `id` field. `None` if absent or not a string: ids are
/// compared as strings only, so a numeric `{"id": 7}` deliberately never
/// matches a lookup for `"7"` — no type coercion.
pub fn item_id(item: &Value) -> Option<&str> {
    item.get("id").and_then(Value::as_str)
}

/// Extract the `productId` field. `None` if absent or not an integer.
pub fn item_product_id(item: &Value) -> Option<i64> {
    item.get("productId").and_then(Value::as_i64)
}
