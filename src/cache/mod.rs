//! Cache Module
//!
//! In-process record cache sitting between the record service and the
//! persistent store. Two interchangeable strategies share one capability:
//! an unbounded map cache and a fixed-capacity LRU cache.

mod lru;
mod map;
mod stats;


use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::models::Record;

// Re-export public types
pub use lru::LruCache;
pub use map::MapCache;
pub use stats::CacheStats;

// == Record Cache Capability ==
/// Key -> record cache keyed by [`Record::id`].
///
/// All operations are total and safe to call from many threads at once.
/// Implementations serialize operations on a single lock per instance.
pub trait RecordCache: Send + Sync {
    /// Inserts or overwrites the entry for `record.id`.
    ///
    /// Overwriting resets recency where the implementation tracks it.
    fn set(&self, record: Record);

    /// Returns a copy of the cached record, or `None` on a miss.
    fn get(&self, key: &str) -> Option<Record>;

    /// Removes the entry if present. Absent keys are ignored.
    fn delete(&self, key: &str);
}

// == Cache Strategy ==
/// Which cache implementation to build at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStrategy {
    /// Unbounded map, never evicts
    Map,
    /// Least-recently-used eviction at a fixed capacity
    Lru { capacity: NonZeroUsize },
}

impl CacheStrategy {
    /// Builds a fresh, empty cache for this strategy.
    pub fn build(&self) -> Arc<dyn RecordCache> {
        match *self {
            CacheStrategy::Map => Arc::new(MapCache::new()),
            CacheStrategy::Lru { capacity } => Arc::new(LruCache::new(capacity)),
        }
    }

    /// Resolves a strategy name ("map" or "lru", any case) with the
    /// capacity used by the bounded variant.
    pub fn from_name(name: &str, capacity: NonZeroUsize) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "map" => Some(CacheStrategy::Map),
            "lru" => Some(CacheStrategy::Lru { capacity }),
            _ => None,
        }
    }

    /// Short lowercase label ("map" or "lru").
    pub fn name(&self) -> &'static str {
        match self {
            CacheStrategy::Map => "map",
            CacheStrategy::Lru { .. } => "lru",
        }
    }

    /// Capacity of the bounded variant.
    pub fn capacity(&self) -> Option<usize> {
        match self {
            CacheStrategy::Map => None,
            CacheStrategy::Lru { capacity } => Some(capacity.get()),
        }
    }
}

impl fmt::Display for CacheStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheStrategy::Map => write!(f, "map"),
            CacheStrategy::Lru { capacity } => write!(f, "lru(capacity={})", capacity),
        }
    }
}
