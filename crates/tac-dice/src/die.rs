//! Die types: standard polyhedral side counts or references to custom dice.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::CustomDieId;

/// Side counts offered as standard dice.
pub const STANDARD_SIDES: [u32; 7] = [2, 4, 6, 8, 10, 12, 20];

/// Side count used whenever a usable one is missing.
pub const DEFAULT_SIDES: u32 = 6;

/// What kind of die an entry rolls.
///
/// Persisted as a number for standard dice and as the custom die's id string
/// otherwise, which keeps older snapshots readable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawDieType", into = "RawDieType")]
pub enum DieType {
    /// A numbered die with faces `1..=sides`.
    Standard(u32),
    /// A user-defined die looked up in the custom die registry.
    CustomRef(CustomDieId),
}

impl DieType {
    /// A standard die, if `sides` is one of [`STANDARD_SIDES`].
    pub fn standard(sides: u32) -> Option<Self> {
        STANDARD_SIDES
            .contains(&sides)
            .then_some(Self::Standard(sides))
    }

    /// The six-sided die every fallback lands on.
    pub fn d6() -> Self {
        Self::Standard(DEFAULT_SIDES)
    }

    /// Whether this is anything other than one of the [`STANDARD_SIDES`].
    ///
    /// Odd side counts such as a d7 read back from older records count as
    /// custom, so they only accept text-capable rules.
    pub fn is_custom(&self) -> bool {
        match self {
            Self::Standard(n) => !STANDARD_SIDES.contains(n),
            Self::CustomRef(_) => true,
        }
    }

    /// The custom die id, if this is a custom reference.
    pub fn custom_id(&self) -> Option<&CustomDieId> {
        match self {
            Self::CustomRef(id) => Some(id),
            Self::Standard(_) => None,
        }
    }

    /// Side count used for numeric rolls.
    ///
    /// Custom references that fail to resolve roll as a d6, as does a
    /// zero-sided standard die.
    pub fn sides(&self) -> u32 {
        match self {
            Self::Standard(0) | Self::CustomRef(_) => DEFAULT_SIDES,
            Self::Standard(n) => *n,
        }
    }

    /// Parse user input such as `"d20"`, `"12"` or a custom die id.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('d')
            .or_else(|| trimmed.strip_prefix('D'))
            .unwrap_or(trimmed);
        match digits.parse::<u32>() {
            Ok(n) if n >= 1 => Self::Standard(n),
            _ => Self::CustomRef(CustomDieId::from(trimmed)),
        }
    }
}

impl Default for DieType {
    fn default() -> Self {
        Self::d6()
    }
}

impl fmt::Display for DieType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard(n) => write!(f, "d{n}"),
            Self::CustomRef(id) => write!(f, "{id}"),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawDieType {
    Sides(i64),
    Id(String),
}

impl From<RawDieType> for DieType {
    fn from(raw: RawDieType) -> Self {
        match raw {
            RawDieType::Sides(n) => match u32::try_from(n) {
                Ok(n) if n >= 1 => Self::Standard(n),
                _ => Self::d6(),
            },
            RawDieType::Id(s) => match s.trim().parse::<u32>() {
                Ok(n) if n >= 1 => Self::Standard(n),
                _ => Self::CustomRef(CustomDieId::from(s)),
            },
        }
    }
}

impl From<DieType> for RawDieType {
    fn from(die: DieType) -> Self {
        match die {
            DieType::Standard(n) => Self::Sides(i64::from(n)),
            DieType::CustomRef(id) => Self::Id(id.into()),
        }
    }
}
