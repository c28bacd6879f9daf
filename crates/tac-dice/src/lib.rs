//! Dice engine for Tactician.
//!
//! Provides standard and custom-faced dice, per-entry threshold rules that
//! classify rolled faces, finite draw bags for blind-bag pools, and the roll
//! engine that turns a pool's entries into a result set. Everything here is
//! pure data plus explicit randomness: callers own the state and pass in an
//! RNG.

pub mod bag;
pub mod custom;
pub mod die;
pub mod entry;
pub mod face;
pub mod id;
pub mod roll;
pub mod threshold;

pub use bag::{BagDefinition, draw};
pub use custom::{CustomDieDefinition, CustomDieRegistry, CustomFace, FaceTemplate, ResolvedDie};
pub use die::{DEFAULT_SIDES, DieType, STANDARD_SIDES};
pub use entry::{DiceEntry, EntryUpdate, PoolMode};
pub use face::FaceValue;
pub use id::{CustomDieId, EntryId, FaceId, PoolId, RollEventId};
pub use roll::{RollOutcome, RollRequest, RollResult, roll};
pub use threshold::{FaceOption, ThresholdKind, ThresholdRule, classify, face_options};
