//! Dice pools.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tac_dice::{
    BagDefinition, DiceEntry, DieType, EntryId, PoolId, PoolMode, RollOutcome, RollRequest,
    RollResult, ThresholdRule,
};

use crate::config::StoreConfig;
use crate::history::{RollEvent, RollHistory};

/// A named group of dice entries with its live results and history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DicePool {
    /// Pool identifier.
    pub id: PoolId,
    /// Display name.
    pub name: String,
    /// Standard or blind-bag rolling.
    #[serde(default)]
    pub mode: PoolMode,
    /// Entries, in declaration order; never empty.
    #[serde(default)]
    pub entries: Vec<DiceEntry>,
    /// Results of the latest roll.
    #[serde(default)]
    pub results: Vec<RollResult>,
    /// When the latest roll happened.
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub last_rolled_at: Option<DateTime<Utc>>,
    /// Recent rolls, newest first.
    #[serde(default)]
    pub history: RollHistory,
    /// Colors offered for the bag.
    #[serde(default)]
    pub available_colors: Vec<String>,
    /// Composition of a full bag.
    #[serde(default)]
    pub bag_definition: BagDefinition,
    /// Items still in the bag.
    #[serde(default)]
    pub current_bag: Vec<String>,
}

impl DicePool {
    /// A new pool with one default d6 entry.
    ///
    /// Blind-bag pools start with a full bag and an unclassified entry.
    pub fn new(mode: PoolMode, config: &StoreConfig) -> Self {
        let (name, rule) = match mode {
            PoolMode::Standard => (&config.standard_pool_name, ThresholdRule::default()),
            PoolMode::BlindBag => (&config.blind_bag_pool_name, ThresholdRule::none()),
        };
        let mut pool = Self {
            id: PoolId::new(),
            name: name.clone(),
            mode,
            entries: vec![DiceEntry::new(DieType::d6()).with_rule(rule)],
            results: Vec::new(),
            last_rolled_at: None,
            history: RollHistory::new(),
            available_colors: config.preset_colors.clone(),
            bag_definition: BagDefinition::uniform(&config.preset_colors, config.bag_quantity),
            current_bag: Vec::new(),
        };
        if mode == PoolMode::BlindBag {
            pool.refill_bag();
        }
        pool
    }

    /// Look up an entry.
    pub fn entry(&self, id: &EntryId) -> Option<&DiceEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    /// Look up an entry for editing.
    pub fn entry_mut(&mut self, id: &EntryId) -> Option<&mut DiceEntry> {
        self.entries.iter_mut().find(|e| &e.id == id)
    }

    /// Append a default d6 entry.
    pub fn add_entry(&mut self) -> EntryId {
        let entry = DiceEntry::new(DieType::d6());
        let id = entry.id.clone();
        self.entries.push(entry);
        id
    }

    /// Remove an entry. Refuses to remove the last one.
    pub fn remove_entry(&mut self, id: &EntryId) -> bool {
        if self.entries.len() <= 1 {
            return false;
        }
        let before = self.entries.len();
        self.entries.retain(|e| &e.id != id);
        self.entries.len() < before
    }

    /// Refill the bag from its definition.
    pub fn refill_bag(&mut self) {
        self.current_bag = self.bag_definition.refill();
    }

    /// The engine's view of this pool.
    pub fn roll_request(&self) -> RollRequest<'_> {
        RollRequest {
            mode: self.mode,
            entries: &self.entries,
            bag: &self.current_bag,
        }
    }

    /// Commit an engine outcome: replace results and bag, and prepend an
    /// event to the history.
    pub fn commit(&mut self, outcome: RollOutcome, at: DateTime<Utc>, history_cap: usize) {
        let event = RollEvent::new(&self.name, self.mode, outcome.results.clone(), at);
        self.results = outcome.results;
        self.current_bag = outcome.bag;
        self.last_rolled_at = Some(at);
        self.history.record(event, history_cap);
    }

    /// Forget the latest results.
    pub fn clear_results(&mut self) {
        self.results.clear();
        self.last_rolled_at = None;
    }

    /// Sum of the latest results' numeric faces.
    pub fn results_sum(&self) -> f64 {
        tac_dice::roll::sum(&self.results)
    }
}
