//! Upstream envelope unwrapping.
//!
//! The search API does not commit to a response shape: the list may be the
//! body itself, sit under one of several keys, or sit one object deeper.

use serde_json::Value;

/// Keys checked, in priority order, for the list payload.
pub const ENVELOPE_KEYS: &[&str] = &[
    "data", "items", "results", "tracks", "songs", "playlists", "albums", "result", "records",
    "list",
];

/// Locate the array payload of an upstream response.
///
/// Checks the body itself, then each envelope key at the top level, and for
/// object-valued keys each envelope key one level down. Anything else
/// yields an empty list.
pub fn to_array(payload: Value) -> Vec<Value> {
    let mut payload = match payload {
        Value::Array(items) => return items,
        Value::Object(map) => map,
        _ => return Vec::new(),
    };

    for key in ENVELOPE_KEYS {
        match payload.remove(*key) {
            Some(Value::Array(items)) => return items,
            Some(Value::Object(mut nested)) => {
                for inner in ENVELOPE_KEYS {
                    if let Some(Value::Array(items)) = nested.remove(*inner) {
                        return items;
                    }
                }
            }
            _ => {}
        }
    }
    Vec::new()
}
