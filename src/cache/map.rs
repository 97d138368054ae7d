//! Map Cache Module
//!
//! Unbounded key -> record cache with no eviction.

use std::collections::HashMap;

use parking_lot::Mutex;

use super::RecordCache;
use crate::models::Record;

// == Map Cache ==
/// Unbounded cache backed by a `HashMap` behind a single mutex.
///
/// Grows with every distinct key that is set. Behaves like [`super::LruCache`]
/// would with unlimited capacity.
#[derive(Debug, Default)]
pub struct MapCache {
    entries: Mutex<HashMap<String, Record>>,
}

impl MapCache {
    // == Constructor ==
    /// Creates an empty map cache.
    pub fn new() -> Self {
        Self::default()
    }

    // == Len ==
    /// Returns the number of cached records.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    // == Is Empty ==
    /// Returns true if no record is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl RecordCache for MapCache {
    fn set(&self, record: Record) {
        self.entries.lock().insert(record.id.clone(), record);
    }

    fn get(&self, key: &str) -> Option<Record> {
        self.entries.lock().get(key).cloned()
    }

    fn delete(&self, key: &str) {
        self.entries.lock().remove(key);
    }
}
