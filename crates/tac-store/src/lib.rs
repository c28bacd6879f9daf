//! Pool and history store for Tactician.
//!
//! Owns every dice pool and custom die, commits rolls from the dice engine
//! into bounded per-pool histories, derives the global history, and moves
//! whole-collection snapshots in and out of an external key-value store,
//! upgrading legacy records on the way in.

pub mod config;
pub mod error;
pub mod history;
pub mod migrate;
pub mod pool;
pub mod snapshot;
pub mod storage;
pub mod store;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use history::{RollEvent, RollHistory};
pub use pool::DicePool;
pub use snapshot::Snapshot;
pub use storage::{DirStore, KeyValueStore, MemoryStore, SnapshotSink, StorageSink};
pub use store::PoolStore;
