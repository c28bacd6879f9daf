//! Dice entries: one group of same-type dice inside a pool.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::die::DieType;
use crate::face::FaceValue;
use crate::id::EntryId;
use crate::threshold::{ThresholdKind, ThresholdRule};

/// How a pool produces results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PoolMode {
    /// Every die is rolled independently.
    #[default]
    Standard,
    /// Colored items are pulled from a finite bag without replacement.
    BlindBag,
}

impl fmt::Display for PoolMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::BlindBag => write!(f, "blind bag"),
        }
    }
}

fn default_count() -> u32 {
    1
}

/// Older records may hold zero, negative or null counts; read them as 1.
fn deserialize_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let count = Option::<i64>::deserialize(deserializer)?.unwrap_or(1);
    Ok(u32::try_from(count.max(1)).unwrap_or(u32::MAX))
}

/// A group of identical dice rolled together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceEntry {
    /// Entry identifier.
    pub id: EntryId,
    /// Die rolled by this entry.
    #[serde(rename = "diceType")]
    pub die_type: DieType,
    /// How many dice to roll (at least 1).
    #[serde(default = "default_count", deserialize_with = "deserialize_count")]
    pub count: u32,
    /// Display color override for results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Success rule for this entry's results.
    #[serde(flatten)]
    pub rule: ThresholdRule,
}

impl DiceEntry {
    /// One die of the given type with the default rule (at least 4).
    pub fn new(die_type: DieType) -> Self {
        let mut entry = Self {
            id: EntryId::new(),
            die_type,
            count: 1,
            color: None,
            rule: ThresholdRule::default(),
        };
        entry.restrict_rule();
        entry
    }

    /// Set the number of dice, clamped to at least 1.
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count.max(1);
        self
    }

    /// Set the success rule.
    pub fn with_rule(mut self, rule: ThresholdRule) -> Self {
        self.rule = rule;
        self.restrict_rule();
        self
    }

    /// Set the display color override.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Apply a partial update, then re-check the rule against the die type.
    pub fn apply(&mut self, update: EntryUpdate) {
        if let Some(die_type) = update.die_type {
            self.die_type = die_type;
        }
        if let Some(count) = update.count {
            self.count = count.max(1);
        }
        if let Some(color) = update.color {
            self.color = color;
        }
        if let Some(kind) = update.kind {
            self.rule.kind = kind;
        }
        if let Some(threshold) = update.threshold {
            self.rule.threshold = threshold;
        }
        if let Some(targets) = update.target_values {
            self.rule.target_values = targets;
        }
        self.restrict_rule();
    }

    /// Custom and non-standard dice cannot be compared numerically; coerce
    /// to match-any.
    fn restrict_rule(&mut self) {
        if self.die_type.is_custom() && !self.rule.kind.supports_text() {
            self.rule.kind = ThresholdKind::MatchAny;
        }
    }
}

/// A partial change to a [`DiceEntry`]; `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryUpdate {
    /// New die type.
    pub die_type: Option<DieType>,
    /// New count (clamped to at least 1).
    pub count: Option<u32>,
    /// New color override; `Some(None)` clears it.
    pub color: Option<Option<String>>,
    /// New rule kind.
    pub kind: Option<ThresholdKind>,
    /// New threshold value.
    pub threshold: Option<FaceValue>,
    /// New target set.
    pub target_values: Option<Vec<FaceValue>>,
}

impl EntryUpdate {
    /// Change the die type.
    pub fn die_type(mut self, die_type: DieType) -> Self {
        self.die_type = Some(die_type);
        self
    }

    /// Change the count.
    pub fn count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    /// Set or clear the color override.
    pub fn color(mut self, color: Option<String>) -> Self {
        self.color = Some(color);
        self
    }

    /// Change the rule kind.
    pub fn kind(mut self, kind: ThresholdKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Change the threshold value.
    pub fn threshold(mut self, threshold: impl Into<FaceValue>) -> Self {
        self.threshold = Some(threshold.into());
        self
    }

    /// Replace the target set.
    pub fn target_values(mut self, targets: Vec<FaceValue>) -> Self {
        self.target_values = Some(targets);
        self
    }
}
