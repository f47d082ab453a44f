//! Cache Key Codec
//!
//! Derives a deterministic cache key from a namespace and a parameter set.
//! Parameters are sorted by name before serialization so that logically
//! identical queries always map to the same key, regardless of the order in
//! which the caller assembled them.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

// == Encode ==
/// Encodes `prefix:namespace:<canonical-json>` for the given parameters.
///
/// The canonical form is the JSON object with keys in lexicographic order;
/// an empty parameter set encodes as `{}`. Values are serialized as-is
/// (nested objects are not re-canonicalized).
pub fn encode(prefix: &str, namespace: &str, params: &HashMap<String, Value>) -> String {
    let sorted: BTreeMap<&str, &Value> = params.iter().map(|(k, v)| (k.as_str(), v)).collect();
    let canonical = serde_json::to_string(&sorted).unwrap_or_else(|_| "{}".to_string());
    format!("{}:{}:{}", prefix, namespace, canonical)
}
