//! The pool store: every pool, every custom die, and the roll loop.
//!
//! `PoolStore` owns all mutable state. Each mutation completes before
//! returning and then hands a fresh [`Snapshot`] to the attached sink, if
//! any. Operations addressing unknown ids do nothing and report it through
//! a `false` or `None` return.

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;

use tac_dice::{
    CustomDieDefinition, CustomDieId, CustomDieRegistry, DieType, EntryId, EntryUpdate, FaceId,
    FaceOption, FaceTemplate, FaceValue, PoolId, PoolMode, RollOutcome, face_options,
};

use crate::config::{DEFAULT_SIDEBAR_WIDTH, MAX_SIDEBAR_WIDTH, MIN_SIDEBAR_WIDTH, StoreConfig};
use crate::history::{RollEvent, merge_newest_first};
use crate::pool::DicePool;
use crate::snapshot::Snapshot;
use crate::storage::SnapshotSink;

/// Owns pools and custom dice, rolls them, and persists after each change.
pub struct PoolStore {
    config: StoreConfig,
    pools: Vec<DicePool>,
    registry: CustomDieRegistry,
    sidebar_width: u32,
    rng: StdRng,
    sink: Option<Box<dyn SnapshotSink>>,
}

impl PoolStore {
    /// Create an empty store.
    pub fn new(config: StoreConfig) -> Self {
        Self::from_snapshot(config, Snapshot::default())
    }

    /// Create a store from previously persisted state.
    ///
    /// A missing or out-of-range sidebar width falls back to the default.
    pub fn from_snapshot(config: StoreConfig, snapshot: Snapshot) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let sidebar_width = snapshot
            .sidebar_width
            .filter(|w| (MIN_SIDEBAR_WIDTH..=MAX_SIDEBAR_WIDTH).contains(w))
            .unwrap_or(DEFAULT_SIDEBAR_WIDTH);
        Self {
            config,
            pools: snapshot.pools,
            registry: CustomDieRegistry::from_dice(snapshot.custom_dice),
            sidebar_width,
            rng,
            sink: None,
        }
    }

    /// Attach a save hook, called after every mutation.
    pub fn with_sink(mut self, sink: impl SnapshotSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Capture the current state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            pools: self.pools.clone(),
            custom_dice: self.registry.dice().to_vec(),
            sidebar_width: Some(self.sidebar_width),
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// All pools, in display order.
    pub fn pools(&self) -> &[DicePool] {
        &self.pools
    }

    /// Look up a pool.
    pub fn pool(&self, id: &PoolId) -> Option<&DicePool> {
        self.pools.iter().find(|p| &p.id == id)
    }

    /// Get the custom die registry.
    pub fn registry(&self) -> &CustomDieRegistry {
        &self.registry
    }

    /// All custom dice, in creation order.
    pub fn custom_dice(&self) -> &[CustomDieDefinition] {
        self.registry.dice()
    }

    /// Current sidebar width.
    pub fn sidebar_width(&self) -> u32 {
        self.sidebar_width
    }

    /// Set the sidebar width. Widths outside 250..=650 are ignored.
    pub fn set_sidebar_width(&mut self, width: u32) -> bool {
        if !(MIN_SIDEBAR_WIDTH..=MAX_SIDEBAR_WIDTH).contains(&width) {
            return false;
        }
        self.sidebar_width = width;
        self.persist();
        true
    }

    // ---- pools ----

    /// Create a pool with one default entry and return its id.
    pub fn create_pool(&mut self, mode: PoolMode) -> PoolId {
        let pool = DicePool::new(mode, &self.config);
        let id = pool.id.clone();
        self.pools.push(pool);
        self.persist();
        id
    }

    /// Delete a pool and its history.
    pub fn delete_pool(&mut self, id: &PoolId) -> bool {
        let before = self.pools.len();
        self.pools.retain(|p| &p.id != id);
        let removed = self.pools.len() < before;
        if removed {
            self.persist();
        }
        removed
    }

    /// Rename a pool. Past events keep the name they were rolled under.
    pub fn rename_pool(&mut self, id: &PoolId, name: impl Into<String>) -> bool {
        let name = name.into();
        self.mutate_pool(id, |pool| pool.name = name).is_some()
    }

    /// Append a default d6 entry to a pool.
    pub fn add_entry(&mut self, pool: &PoolId) -> Option<EntryId> {
        self.mutate_pool(pool, DicePool::add_entry)
    }

    /// Remove an entry. Does nothing to a pool's last entry.
    pub fn remove_entry(&mut self, pool: &PoolId, entry: &EntryId) -> bool {
        let removed = self.pool_mut(pool).is_some_and(|p| p.remove_entry(entry));
        self.persist_if(removed)
    }

    /// Apply a partial update to an entry.
    pub fn update_entry(&mut self, pool: &PoolId, entry: &EntryId, update: EntryUpdate) -> bool {
        let Some(target) = self.pool_mut(pool).and_then(|p| p.entry_mut(entry)) else {
            return false;
        };
        target.apply(update);
        self.persist();
        true
    }

    /// Toggle a target value on an entry's rule. Returns whether the value
    /// is now a target, or `None` if the pool or entry is unknown.
    pub fn toggle_target_value(&mut self, pool: &PoolId, entry: &EntryId, value: FaceValue) -> Option<bool> {
        let target = self.pool_mut(pool)?.entry_mut(entry)?;
        let now_target = target.rule.toggle_target(value);
        self.persist();
        Some(now_target)
    }

    /// Set how many items of `color` a full bag holds (negative means zero).
    /// The live bag is left alone until the next refill.
    pub fn set_bag_quantity(&mut self, pool: &PoolId, color: &str, quantity: i64) -> bool {
        self.mutate_pool(pool, |p| p.bag_definition.set_quantity(color, quantity))
            .is_some()
    }

    /// Refill a pool's bag from its definition.
    pub fn refill_bag(&mut self, pool: &PoolId) -> bool {
        self.mutate_pool(pool, |p| {
            p.refill_bag();
            tracing::debug!(pool = %p.name, items = p.current_bag.len(), "refilled bag");
        })
        .is_some()
    }

    // ---- rolling and history ----

    /// Roll a pool and commit the outcome. Returns the recorded event.
    pub fn roll_pool(&mut self, id: &PoolId) -> Option<&RollEvent> {
        let outcome = {
            let pool = self.pools.iter().find(|p| &p.id == id)?;
            tac_dice::roll(&pool.roll_request(), &self.registry, &mut self.rng)
        };
        self.record_roll(id, outcome, now())
    }

    /// Roll every pool, in display order. Returns the number rolled.
    pub fn roll_all(&mut self) -> usize {
        let ids: Vec<PoolId> = self.pools.iter().map(|p| p.id.clone()).collect();
        ids.iter().filter(|id| self.roll_pool(id).is_some()).count()
    }

    /// Commit an externally produced outcome at a given time.
    pub fn record_roll(&mut self, id: &PoolId, outcome: RollOutcome, at: DateTime<Utc>) -> Option<&RollEvent> {
        let cap = self.config.history_cap;
        self.mutate_pool(id, |pool| pool.commit(outcome, at, cap))?;
        self.pool(id).and_then(|p| p.history.latest())
    }

    /// Forget a pool's latest results.
    pub fn clear_results(&mut self, pool: &PoolId) -> bool {
        self.mutate_pool(pool, DicePool::clear_results).is_some()
    }

    /// Forget every pool's latest results.
    pub fn clear_all_results(&mut self) {
        self.pools.iter_mut().for_each(DicePool::clear_results);
        self.persist();
    }

    /// Drop a pool's history.
    pub fn clear_history(&mut self, pool: &PoolId) -> bool {
        self.mutate_pool(pool, |p| p.history.clear()).is_some()
    }

    /// Drop every pool's history.
    pub fn clear_all_history(&mut self) {
        for pool in &mut self.pools {
            pool.history.clear();
        }
        self.persist();
    }

    /// Every pool's events merged newest first, capped.
    pub fn global_history(&self) -> Vec<&RollEvent> {
        merge_newest_first(
            self.pools.iter().map(|p| &p.history),
            self.config.global_history_cap,
        )
    }

    /// Achievable faces for an entry with their classification.
    pub fn entry_face_options(&self, pool: &PoolId, entry: &EntryId) -> Option<Vec<FaceOption>> {
        let entry = self.pool(pool)?.entry(entry)?;
        Some(face_options(entry, &self.registry))
    }

    // ---- custom dice ----

    /// Define a new custom die and return its id.
    pub fn add_custom_die(&mut self) -> CustomDieId {
        let color = self.config.preset_color(self.registry.len());
        let id = self.registry.create(color);
        self.persist();
        id
    }

    /// Delete a custom die. Entries rolling it fall back to a standard d6.
    pub fn delete_custom_die(&mut self, id: &CustomDieId) -> bool {
        if self.registry.remove(id).is_none() {
            return false;
        }
        let mut repointed = 0;
        for entry in self.pools.iter_mut().flat_map(|p| p.entries.iter_mut()) {
            if entry.die_type.custom_id() == Some(id) {
                entry.die_type = DieType::d6();
                repointed += 1;
            }
        }
        tracing::debug!(die = %id, repointed, "deleted custom die");
        self.persist();
        true
    }

    /// Rename a custom die.
    pub fn rename_custom_die(&mut self, id: &CustomDieId, name: impl Into<String>) -> bool {
        let name = name.into();
        self.mutate_die(id, |die| die.name = name).is_some()
    }

    /// Recolor a custom die.
    pub fn recolor_custom_die(&mut self, id: &CustomDieId, color: impl Into<String>) -> bool {
        let color = color.into();
        self.mutate_die(id, |die| die.color = color).is_some()
    }

    /// Append a face labelled with its position.
    pub fn add_face(&mut self, id: &CustomDieId) -> Option<FaceId> {
        self.mutate_die(id, CustomDieDefinition::add_face)
    }

    /// Remove a face. Does nothing to a die's last face.
    pub fn remove_face(&mut self, id: &CustomDieId, face: &FaceId) -> bool {
        let removed = self.registry.get_mut(id).is_some_and(|die| die.remove_face(face));
        self.persist_if(removed)
    }

    /// Change a face's content.
    pub fn set_face_content(&mut self, id: &CustomDieId, face: &FaceId, content: impl Into<String>) -> bool {
        let content = content.into();
        let changed = self
            .registry
            .get_mut(id)
            .is_some_and(|die| die.set_face_content(face, content));
        self.persist_if(changed)
    }

    /// Replace a die's faces with a template.
    pub fn apply_template(&mut self, id: &CustomDieId, template: FaceTemplate) -> bool {
        self.mutate_die(id, |die| die.apply_template(template)).is_some()
    }

    // ---- internals ----

    fn pool_mut(&mut self, id: &PoolId) -> Option<&mut DicePool> {
        self.pools.iter_mut().find(|p| &p.id == id)
    }

    fn mutate_pool<T>(&mut self, id: &PoolId, f: impl FnOnce(&mut DicePool) -> T) -> Option<T> {
        let pool = self.pool_mut(id)?;
        let out = f(pool);
        self.persist();
        Some(out)
    }

    fn mutate_die<T>(&mut self, id: &CustomDieId, f: impl FnOnce(&mut CustomDieDefinition) -> T) -> Option<T> {
        let die = self.registry.get_mut(id)?;
        let out = f(die);
        self.persist();
        Some(out)
    }

    /// Persist only if something changed; passes `changed` through.
    fn persist_if(&mut self, changed: bool) -> bool {
        if changed {
            self.persist();
        }
        changed
    }

    fn persist(&mut self) {
        if self.sink.is_none() {
            return;
        }
        let snapshot = self.snapshot();
        if let Some(sink) = self.sink.as_mut() {
            sink.persist(&snapshot);
        }
    }
}

impl std::fmt::Debug for PoolStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolStore")
            .field("pools", &self.pools.len())
            .field("custom_dice", &self.registry.len())
            .field("sidebar_width", &self.sidebar_width)
            .field("sink", &self.sink.is_some())
            .finish_non_exhaustive()
    }
}

/// Current time at millisecond precision, matching the persisted form.
fn now() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}
