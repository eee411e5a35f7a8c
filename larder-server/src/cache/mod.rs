//! Freshness-coordinated snapshot cache

mod snapshot;

pub use snapshot::{CacheStatus, Snapshot, SnapshotCache};
