//! Threshold rules that classify rolled faces as successes or failures.
//!
//! Each dice entry carries its own rule:
//! - **None**: results are left unclassified
//! - **At least / At most / Exactly**: numeric comparison against a threshold
//! - **Match any**: the face must equal one of a set of target labels
//!
//! Classification is total. Inputs that cannot be compared count as a miss,
//! never as an error.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::custom::CustomDieRegistry;
use crate::entry::DiceEntry;
use crate::face::FaceValue;

/// How a rule compares a face to its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThresholdKind {
    /// No classification.
    None,
    /// Success when the face is at or above the threshold.
    #[default]
    AtLeast,
    /// Success when the face is at or below the threshold.
    AtMost,
    /// Success when the face equals the threshold.
    Exactly,
    /// Success when the face matches any target value.
    MatchAny,
}

impl ThresholdKind {
    /// Whether this kind can classify arbitrary textual faces.
    ///
    /// Custom dice only accept these kinds.
    pub fn supports_text(self) -> bool {
        matches!(self, Self::None | Self::MatchAny)
    }
}

impl fmt::Display for ThresholdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::AtLeast => write!(f, ">="),
            Self::AtMost => write!(f, "<="),
            Self::Exactly => write!(f, "="),
            Self::MatchAny => write!(f, "match any"),
        }
    }
}

/// A per-entry success rule.
///
/// Serialized flat into its entry as `thresholdType`, `threshold` and
/// `targetValues`. Missing fields fall back to the default entry rule,
/// at least 4.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThresholdRule {
    /// Comparison kind.
    #[serde(rename = "thresholdType")]
    pub kind: ThresholdKind,
    /// Comparison value for the numeric kinds.
    pub threshold: FaceValue,
    /// Labels accepted by [`ThresholdKind::MatchAny`].
    pub target_values: Vec<FaceValue>,
}

impl Default for ThresholdRule {
    fn default() -> Self {
        Self::at_least(4)
    }
}

impl ThresholdRule {
    fn numeric(kind: ThresholdKind, threshold: impl Into<FaceValue>) -> Self {
        Self {
            kind,
            threshold: threshold.into(),
            target_values: Vec::new(),
        }
    }

    /// A rule that leaves every result unclassified.
    pub fn none() -> Self {
        Self::numeric(ThresholdKind::None, 4)
    }

    /// Success at or above `threshold`.
    pub fn at_least(threshold: impl Into<FaceValue>) -> Self {
        Self::numeric(ThresholdKind::AtLeast, threshold)
    }

    /// Success at or below `threshold`.
    pub fn at_most(threshold: impl Into<FaceValue>) -> Self {
        Self::numeric(ThresholdKind::AtMost, threshold)
    }

    /// Success on exactly `threshold`.
    pub fn exactly(threshold: impl Into<FaceValue>) -> Self {
        Self::numeric(ThresholdKind::Exactly, threshold)
    }

    /// Success on any of `targets`.
    pub fn match_any<I, V>(targets: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FaceValue>,
    {
        Self {
            kind: ThresholdKind::MatchAny,
            threshold: FaceValue::Number(4),
            target_values: targets.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `value` matches one of the targets after normalization.
    pub fn has_target(&self, value: &FaceValue) -> bool {
        let wanted = value.normalized();
        self.target_values.iter().any(|t| t.normalized() == wanted)
    }

    /// Add `value` to the targets, or remove every target equal to it after
    /// normalization. Returns true if the value is now a target.
    pub fn toggle_target(&mut self, value: FaceValue) -> bool {
        if self.has_target(&value) {
            let wanted = value.normalized();
            self.target_values.retain(|t| t.normalized() != wanted);
            false
        } else {
            self.target_values.push(value);
            true
        }
    }

    /// Classify a face under this rule. See [`classify`].
    pub fn classify(&self, value: &FaceValue) -> Option<bool> {
        classify(value, self)
    }
}

/// Classify a rolled face against a rule.
///
/// `None` means the rule does not classify. Numeric kinds compare parsed
/// numbers; a non-numeric face only succeeds under `Exactly`, by normalized
/// label equality with the threshold.
pub fn classify(value: &FaceValue, rule: &ThresholdRule) -> Option<bool> {
    let kind = match rule.kind {
        ThresholdKind::None => return None,
        ThresholdKind::MatchAny => return Some(rule.has_target(value)),
        kind => kind,
    };

    let Some(face) = value.as_number() else {
        return Some(kind == ThresholdKind::Exactly && value.matches(&rule.threshold));
    };
    let Some(threshold) = rule.threshold.as_number() else {
        return Some(false);
    };

    Some(match kind {
        ThresholdKind::AtLeast => face >= threshold,
        ThresholdKind::AtMost => face <= threshold,
        _ => face == threshold,
    })
}

/// A selectable face together with how the entry's rule classifies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceOption {
    /// The face.
    pub value: FaceValue,
    /// Its classification under the entry's rule.
    pub success: Option<bool>,
}

/// Every achievable face of an entry's die, classified by the entry's rule.
///
/// Backs face-selector controls, so they agree with live results.
pub fn face_options(entry: &DiceEntry, registry: &CustomDieRegistry) -> Vec<FaceOption> {
    registry
        .achievable_faces(&entry.die_type)
        .into_iter()
        .map(|value| {
            let success = classify(&value, &entry.rule);
            FaceOption { value, success }
        })
        .collect()
}
