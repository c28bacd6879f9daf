//! Roll events and bounded, newest-first histories.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tac_dice::roll::{successes, sum};
use tac_dice::{PoolMode, RollEventId, RollResult};

/// Label recorded with every event; rules live on the entries.
pub const PER_ENTRY_RULES: &str = "Per-entry rules";

fn per_entry_rules() -> String {
    PER_ENTRY_RULES.to_string()
}

/// A committed roll. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollEvent {
    /// Event identifier.
    pub id: RollEventId,
    /// Pool name at roll time.
    pub pool_name: String,
    /// When the roll was committed.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    /// Copy of the results.
    pub results: Vec<RollResult>,
    /// Sum of numeric faces.
    pub sum: f64,
    /// Number of successes.
    pub successes: u32,
    /// Threshold summary label.
    #[serde(default = "per_entry_rules")]
    pub threshold_info: String,
    /// Pool mode at roll time.
    #[serde(default)]
    pub mode: PoolMode,
}

impl RollEvent {
    /// Build an event from a result set, computing its aggregates.
    pub fn new(
        pool_name: impl Into<String>,
        mode: PoolMode,
        results: Vec<RollResult>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RollEventId::new(),
            pool_name: pool_name.into(),
            timestamp,
            sum: sum(&results),
            successes: successes(&results),
            results,
            threshold_info: per_entry_rules(),
            mode,
        }
    }
}

impl fmt::Display for RollEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<String> = self.results.iter().map(|r| r.value.to_string()).collect();
        let noun = if self.successes == 1 { "success" } else { "successes" };
        write!(
            f,
            "{}: [{}] sum {}, {} {noun}",
            self.pool_name,
            values.join(", "),
            self.sum,
            self.successes
        )
    }
}

/// A pool's recent events, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RollHistory {
    events: Vec<RollEvent>,
}

impl RollHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend an event, evicting the oldest beyond `cap`.
    pub fn record(&mut self, event: RollEvent, cap: usize) {
        self.events.insert(0, event);
        self.events.truncate(cap);
    }

    /// The most recent event.
    pub fn latest(&self) -> Option<&RollEvent> {
        self.events.first()
    }

    /// Events, newest first.
    pub fn events(&self) -> &[RollEvent] {
        &self.events
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no events are recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drop every event.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

/// Merge several histories into one newest-first view of at most `cap`
/// events. Events with equal timestamps keep their input order.
pub fn merge_newest_first<'a, I>(histories: I, cap: usize) -> Vec<&'a RollEvent>
where
    I: IntoIterator<Item = &'a RollHistory>,
{
    let mut merged: Vec<&RollEvent> = histories
        .into_iter()
        .flat_map(|h| h.events.iter())
        .collect();
    merged.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    merged.truncate(cap);
    merged
}
