//! Upgrades for legacy persisted pools.
//!
//! Early versions stored one threshold rule per pool. Pools that still carry
//! pool-level `thresholdType`, `threshold` or `targetValues` hand them down
//! to every entry that lacks its own value, and the pool-level fields are
//! dropped. Running the upgrade twice is a no-op.

use serde_json::{Map, Value};

const POOL_LEVEL_FIELDS: [&str; 3] = ["threshold", "thresholdType", "targetValues"];

/// Migrate every legacy pool in a raw pool list.
///
/// Returns the number of pools that were upgraded. Non-object items are left
/// for deserialization to reject.
pub fn migrate_pools(pools: &mut [Value]) -> usize {
    pools
        .iter_mut()
        .filter_map(Value::as_object_mut)
        .map(migrate_pool)
        .filter(|migrated| *migrated)
        .count()
}

/// Migrate one raw pool object. Returns true if it was a legacy pool.
pub fn migrate_pool(pool: &mut Map<String, Value>) -> bool {
    let legacy = pool.contains_key("threshold") || pool.contains_key("thresholdType");
    if !legacy || !pool.get("entries").is_some_and(Value::is_array) {
        return false;
    }

    let kind = pool_value(pool, "thresholdType").unwrap_or_else(|| Value::from("AT_LEAST"));
    let threshold = pool_value(pool, "threshold").unwrap_or_else(|| Value::from(4));
    let targets = pool_value(pool, "targetValues").unwrap_or_else(|| Value::Array(Vec::new()));

    if let Some(Value::Array(entries)) = pool.get_mut("entries") {
        for entry in entries.iter_mut().filter_map(Value::as_object_mut) {
            if !entry.get("thresholdType").is_some_and(truthy) {
                entry.insert("thresholdType".to_string(), kind.clone());
            }
            if entry.get("threshold").is_none_or(Value::is_null) {
                entry.insert("threshold".to_string(), threshold.clone());
            }
            if !entry.get("targetValues").is_some_and(truthy) {
                entry.insert("targetValues".to_string(), targets.clone());
            }
        }
    }

    for field in POOL_LEVEL_FIELDS {
        pool.remove(field);
    }

    let name = pool.get("name").and_then(Value::as_str).unwrap_or("<unnamed>");
    tracing::info!(pool = name, "migrated legacy pool-level threshold to entries");
    true
}

fn pool_value(pool: &Map<String, Value>, field: &str) -> Option<Value> {
    pool.get(field).filter(|v| truthy(v)).cloned()
}

/// Loose truthiness, matching how the legacy fields were read.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entries_inherit_missing_fields() {
        let mut pools = vec![json!({
            "id": "p1",
            "name": "Old Pool",
            "thresholdType": "AT_MOST",
            "threshold": 3,
            "targetValues": ["HIT"],
            "entries": [
                {"id": "e1", "diceType": 6, "count": 2},
                {"id": "e2", "diceType": 8, "count": 1, "thresholdType": "EXACTLY", "threshold": 8}
            ]
        })];

        assert_eq!(migrate_pools(&mut pools), 1);
        let pool = &pools[0];
        assert!(pool.get("threshold").is_none());
        assert!(pool.get("thresholdType").is_none());
        assert!(pool.get("targetValues").is_none());

        let e1 = &pool["entries"][0];
        assert_eq!(e1["thresholdType"], "AT_MOST");
        assert_eq!(e1["threshold"], 3);
        assert_eq!(e1["targetValues"], json!(["HIT"]));

        let e2 = &pool["entries"][1];
        assert_eq!(e2["thresholdType"], "EXACTLY");
        assert_eq!(e2["threshold"], 8);
        assert_eq!(e2["targetValues"], json!(["HIT"]));
    }

    #[test]
    fn falsy_pool_values_use_defaults() {
        let mut pools = vec![json!({
            "name": "Older Pool",
            "thresholdType": "",
            "threshold": 0,
            "entries": [{"id": "e1", "diceType": 6}]
        })];
        migrate_pools(&mut pools);
        let entry = &pools[0]["entries"][0];
        assert_eq!(entry["thresholdType"], "AT_LEAST");
        assert_eq!(entry["threshold"], 4);
        assert_eq!(entry["targetValues"], json!([]));
    }

    #[test]
    fn entry_threshold_of_zero_is_kept() {
        let mut pools = vec![json!({
            "threshold": 5,
            "entries": [{"id": "e1", "diceType": 6, "threshold": 0}]
        })];
        migrate_pools(&mut pools);
        assert_eq!(pools[0]["entries"][0]["threshold"], 0);
    }

    #[test]
    fn migration_is_idempotent() {
        let mut pools = vec![json!({
            "name": "Old Pool",
            "thresholdType": "AT_MOST",
            "threshold": 3,
            "entries": [{"id": "e1", "diceType": 6}]
        })];
        assert_eq!(migrate_pools(&mut pools), 1);
        let once = pools.clone();
        assert_eq!(migrate_pools(&mut pools), 0);
        assert_eq!(pools, once);
    }

    #[test]
    fn current_pools_are_untouched() {
        let original = json!({
            "name": "New Pool",
            "entries": [{"id": "e1", "diceType": 6, "thresholdType": "NONE", "threshold": 4, "targetValues": []}]
        });
        let mut pools = vec![original.clone(), json!("garbage")];
        assert_eq!(migrate_pools(&mut pools), 0);
        assert_eq!(pools[0], original);
    }

    #[test]
    fn pool_without_entries_is_not_migrated() {
        let mut pools = vec![json!({"name": "Broken", "threshold": 4})];
        assert_eq!(migrate_pools(&mut pools), 0);
        assert_eq!(pools[0]["threshold"], 4);
    }
}
