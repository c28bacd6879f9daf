//! Whole-collection snapshots of store state.
//!
//! State is persisted under three keys, each holding one whole collection.
//! Decoding is per key: a malformed value costs only its own collection,
//! which then starts empty.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use tac_dice::{CustomDieDefinition, DiceEntry, DieType};

use crate::error::{StoreError, StoreResult};
use crate::migrate::migrate_pools;
use crate::pool::DicePool;
use crate::storage::KeyValueStore;

/// Key holding the pool list.
pub const POOLS_KEY: &str = "tactician_pools";

/// Key holding the custom die list.
pub const CUSTOM_DICE_KEY: &str = "tactician_custom_dice";

/// Key holding the sidebar width.
pub const SIDEBAR_WIDTH_KEY: &str = "tactician_sidebar_width";

/// Everything the store persists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// All pools, in display order.
    pub pools: Vec<DicePool>,
    /// All custom dice, in creation order.
    pub custom_dice: Vec<CustomDieDefinition>,
    /// Persisted sidebar width, if any.
    pub sidebar_width: Option<u32>,
}

impl Snapshot {
    /// Decode a pool list, upgrading legacy pools first.
    pub fn decode_pools(json: &str) -> StoreResult<Vec<DicePool>> {
        let mut raw: Value = serde_json::from_str(json)?;
        let Value::Array(items) = &mut raw else {
            return Err(StoreError::NotAnArray(POOLS_KEY.to_string()));
        };
        migrate_pools(items);
        let mut pools: Vec<DicePool> = serde_json::from_value(raw)?;
        for pool in &mut pools {
            if pool.entries.is_empty() {
                tracing::warn!(pool = %pool.name, "pool had no entries, adding a default d6");
                pool.entries.push(DiceEntry::new(DieType::d6()));
            }
        }
        Ok(pools)
    }

    /// Decode a custom die list.
    pub fn decode_custom_dice(json: &str) -> StoreResult<Vec<CustomDieDefinition>> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decode a sidebar width; `None` if it is not a whole number.
    pub fn decode_sidebar_width(text: &str) -> Option<u32> {
        text.trim().parse().ok()
    }

    /// Build a snapshot from raw persisted values.
    ///
    /// Missing keys give empty collections. Malformed values are logged and
    /// treated as missing.
    pub fn from_raw(pools: Option<&str>, custom_dice: Option<&str>, sidebar_width: Option<&str>) -> Self {
        let pools = pools
            .map(|json| {
                Self::decode_pools(json).unwrap_or_else(|err| {
                    tracing::warn!(key = POOLS_KEY, %err, "discarding malformed pools");
                    Vec::new()
                })
            })
            .unwrap_or_default();
        let custom_dice = custom_dice
            .map(|json| {
                Self::decode_custom_dice(json).unwrap_or_else(|err| {
                    tracing::warn!(key = CUSTOM_DICE_KEY, %err, "discarding malformed custom dice");
                    Vec::new()
                })
            })
            .unwrap_or_default();
        let sidebar_width = sidebar_width.and_then(|text| {
            let width = Self::decode_sidebar_width(text);
            if width.is_none() {
                tracing::warn!(key = SIDEBAR_WIDTH_KEY, value = text, "ignoring malformed sidebar width");
            }
            width
        });
        Self {
            pools,
            custom_dice,
            sidebar_width,
        }
    }

    /// Load a snapshot from a key-value store. Never fails; unreadable keys
    /// are logged and treated as missing.
    pub fn load<K: KeyValueStore + ?Sized>(store: &K) -> Self {
        let read = |key: &str| match store.get(key) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key, %err, "failed to read persisted value");
                None
            }
        };
        let pools = read(POOLS_KEY);
        let custom_dice = read(CUSTOM_DICE_KEY);
        let sidebar_width = read(SIDEBAR_WIDTH_KEY);
        Self::from_raw(pools.as_deref(), custom_dice.as_deref(), sidebar_width.as_deref())
    }

    /// Write every collection to a key-value store.
    pub fn save<K: KeyValueStore + ?Sized>(&self, store: &mut K) -> StoreResult<()> {
        store.set(POOLS_KEY, serde_json::to_string(&self.pools)?)?;
        store.set(CUSTOM_DICE_KEY, serde_json::to_string(&self.custom_dice)?)?;
        if let Some(width) = self.sidebar_width {
            store.set(SIDEBAR_WIDTH_KEY, width.to_string())?;
        }
        Ok(())
    }
}
