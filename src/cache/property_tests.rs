//! Property-Based Tests for the Cache Module
//!
//! Uses proptest to verify the key-codec and in-memory store invariants.

use proptest::prelude::*;
use std::collections::HashMap;

use serde_json::Value;

use crate::cache::key;
use crate::cache::local::{LocalStore, Lookup};
use crate::cache::current_millis;

// == Test Configuration ==
const TEST_MAX_ENTRIES: usize = 1000;
const TEST_TRIM_TARGET: usize = 800;

// == Strategies ==
/// Generates valid cache keys
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_:]{1,64}"
}

/// Generates serialized cache values
fn valid_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,256}"
}

/// Generates parameter names
fn param_name_strategy() -> impl Strategy<Value = String> {
    "[a-z_]{1,12}"
}

/// Generates JSON-ish parameter values
fn param_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        "[a-zA-Z0-9]{0,16}".prop_map(Value::from),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // The derived key depends only on the parameter set, never on the order
    // in which the caller assembled it.
    #[test]
    fn prop_key_encoding_order_independent(
        params in prop::collection::hash_map(param_name_strategy(), param_value_strategy(), 0..8)
    ) {
        let params: Vec<(String, Value)> = params.into_iter().collect();
        let forward: HashMap<String, Value> = params.iter().cloned().collect();
        let reverse: HashMap<String, Value> = params.iter().rev().cloned().collect();

        prop_assert_eq!(
            key::encode("fundadmin", "ns", &forward),
            key::encode("fundadmin", "ns", &reverse)
        );
    }

    // Distinct parameter sets produce distinct keys (no collisions from
    // the canonicalization step).
    #[test]
    fn prop_key_encoding_injective_on_values(
        name in param_name_strategy(),
        a in any::<i64>(),
        b in any::<i64>(),
    ) {
        prop_assume!(a != b);
        let mut pa = HashMap::new();
        pa.insert(name.clone(), Value::from(a));
        let mut pb = HashMap::new();
        pb.insert(name, Value::from(b));

        prop_assert_ne!(
            key::encode("fundadmin", "ns", &pa),
            key::encode("fundadmin", "ns", &pb)
        );
    }

    // Storing a pair and reading it back before expiry returns the stored
    // value exactly.
    #[test]
    fn prop_roundtrip_storage(key in valid_key_strategy(), value in valid_value_strategy()) {
        let mut store = LocalStore::new(TEST_MAX_ENTRIES, TEST_TRIM_TARGET);
        let now = current_millis();

        store.insert(key.clone(), value.clone(), 300, now);

        match store.get(&key, now) {
            Lookup::Hit(stored) => prop_assert_eq!(stored, value),
            other => prop_assert!(false, "expected hit, got {:?}", other),
        }
    }

    // After a delete, a subsequent lookup misses.
    #[test]
    fn prop_delete_removes_entry(key in valid_key_strategy(), value in valid_value_strategy()) {
        let mut store = LocalStore::new(TEST_MAX_ENTRIES, TEST_TRIM_TARGET);
        let now = current_millis();

        store.insert(key.clone(), value, 300, now);
        prop_assert!(store.remove(&key));

        prop_assert!(matches!(store.get(&key, now), Lookup::Miss));
    }

    // Storing V1 then V2 under the same key yields V2.
    #[test]
    fn prop_overwrite_semantics(
        key in valid_key_strategy(),
        v1 in valid_value_strategy(),
        v2 in valid_value_strategy(),
    ) {
        let mut store = LocalStore::new(TEST_MAX_ENTRIES, TEST_TRIM_TARGET);
        let now = current_millis();

        store.insert(key.clone(), v1, 300, now);
        store.insert(key.clone(), v2.clone(), 300, now);

        match store.get(&key, now) {
            Lookup::Hit(stored) => prop_assert_eq!(stored, v2),
            other => prop_assert!(false, "expected hit, got {:?}", other),
        }
    }

    // The store never holds more entries than the hard cap; the insert that
    // crosses it trims back to the target and growth resumes from there.
    #[test]
    fn prop_capacity_bounded(extra in 0usize..200) {
        let mut store = LocalStore::new(TEST_MAX_ENTRIES, TEST_TRIM_TARGET);
        let now = current_millis();

        for i in 0..(TEST_MAX_ENTRIES + extra) {
            store.insert(format!("key{}", i), "v".to_string(), 300, now);
            prop_assert!(store.len() <= TEST_MAX_ENTRIES);
        }

        if extra > 0 {
            prop_assert_eq!(store.len(), TEST_TRIM_TARGET + (extra - 1));
        }

        // The periodic sweep brings any burst growth back to the target
        store.enforce_capacity();
        prop_assert!(store.len() <= TEST_TRIM_TARGET);
    }

    // Pattern clears remove exactly the keys containing the fragment.
    #[test]
    fn prop_clear_matching_is_exact(values in prop::collection::vec(valid_value_strategy(), 1..20)) {
        let mut store = LocalStore::new(TEST_MAX_ENTRIES, TEST_TRIM_TARGET);
        let now = current_millis();

        for (i, value) in values.iter().enumerate() {
            let ns = if i % 2 == 0 { "financial" } else { "members" };
            store.insert(format!("fundadmin:{}:{}", ns, i), value.clone(), 300, now);
        }
        let financial = values.len().div_ceil(2);

        let cleared = store.clear_matching("fundadmin:financial:");

        prop_assert_eq!(cleared, financial);
        prop_assert_eq!(store.len(), values.len() - financial);
    }
}
