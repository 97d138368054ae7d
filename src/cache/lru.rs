//! LRU Cache Module
//!
//! Fixed-capacity record cache with least-recently-used eviction.

use std::collections::HashMap;
use std::num::NonZeroUsize;

use parking_lot::Mutex;
use tracing::debug;

use super::RecordCache;
use crate::models::Record;

// == Node ==
/// One slot of the recency sequence. Owns the cached record; the lookup map
/// refers to it by slot index.
#[derive(Debug)]
struct Node {
    record: Record,
    /// Neighbour towards the front (more recently used)
    prev: Option<usize>,
    /// Neighbour towards the back (less recently used)
    next: Option<usize>,
}

// == Recency List ==
/// Lookup map plus an index-linked doubly linked list stored in a dense `Vec`.
///
/// - `head` = most recently used
/// - `tail` = least recently used
///
/// Every key in `index` names exactly one live slot in `nodes`, and every slot
/// is reachable from `head`.
#[derive(Debug, Default)]
struct RecencyList {
    index: HashMap<String, usize>,
    nodes: Vec<Node>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl RecencyList {
    fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Detaches a slot from its neighbours, leaving it in `nodes`.
    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        match prev {
            Some(p) => self.nodes[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.nodes[n].prev = prev,
            None => self.tail = prev,
        }
        self.nodes[idx].prev = None;
        self.nodes[idx].next = None;
    }

    /// Links a detached slot in at the front.
    fn push_front(&mut self, idx: usize) {
        self.nodes[idx].prev = None;
        self.nodes[idx].next = self.head;
        if let Some(h) = self.head {
            self.nodes[h].prev = Some(idx);
        }
        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    /// Moves a slot to the front.
    fn promote(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        self.unlink(idx);
        self.push_front(idx);
    }

    fn insert_front(&mut self, record: Record) {
        let idx = self.nodes.len();
        self.index.insert(record.id.clone(), idx);
        self.nodes.push(Node {
            record,
            prev: None,
            next: None,
        });
        self.push_front(idx);
    }

    /// Removes a slot from both the list and the map and returns its record.
    ///
    /// The last slot is swapped into the hole, so its neighbours and its map
    /// entry are re-pointed at `idx`.
    fn remove(&mut self, idx: usize) -> Record {
        self.unlink(idx);
        let node = self.nodes.swap_remove(idx);
        self.index.remove(&node.record.id);

        if idx < self.nodes.len() {
            let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
            match prev {
                Some(p) => self.nodes[p].next = Some(idx),
                None => self.head = Some(idx),
            }
            match next {
                Some(n) => self.nodes[n].prev = Some(idx),
                None => self.tail = Some(idx),
            }
            if let Some(slot) = self.index.get_mut(&self.nodes[idx].record.id) {
                *slot = idx;
            }
        }

        node.record
    }

    /// Keys from most to least recently used.
    fn keys(&self) -> Vec<String> {
        let mut keys = Vec::with_capacity(self.nodes.len());
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            keys.push(self.nodes[idx].record.id.clone());
            cursor = self.nodes[idx].next;
        }
        keys
    }
}

// == LRU Cache ==
/// Bounded record cache evicting the least recently used entry.
///
/// Both `set` and a successful `get` make the key the most recently used.
/// Only inserting a new key into a full cache evicts.
#[derive(Debug)]
pub struct LruCache {
    capacity: NonZeroUsize,
    state: Mutex<RecencyList>,
}

impl LruCache {
    // == Constructor ==
    /// Creates an empty LRU cache holding at most `capacity` records.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            state: Mutex::new(RecencyList::default()),
        }
    }

    // == Capacity ==
    /// Maximum number of records held before eviction.
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    // == Len ==
    /// Returns the number of cached records.
    pub fn len(&self) -> usize {
        self.state.lock().len()
    }

    // == Is Empty ==
    /// Returns true if no record is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // == Keys By Recency ==
    /// Returns cached keys ordered from most to least recently used.
    ///
    /// Does not affect recency.
    pub fn keys_by_recency(&self) -> Vec<String> {
        self.state.lock().keys()
    }

    /// Panics if the map and the recency list disagree.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let state = self.state.lock();
        let keys = state.keys();
        assert_eq!(keys.len(), state.nodes.len(), "list does not reach every slot");
        assert_eq!(state.index.len(), state.nodes.len(), "map and list sizes differ");
        assert!(state.nodes.len() <= self.capacity.get(), "capacity exceeded");
        for (idx, node) in state.nodes.iter().enumerate() {
            assert_eq!(state.index.get(&node.record.id), Some(&idx));
        }
        match (state.head, state.tail) {
            (None, None) => assert!(state.nodes.is_empty()),
            (Some(h), Some(t)) => {
                assert!(state.nodes[h].prev.is_none());
                assert!(state.nodes[t].next.is_none());
            }
            _ => panic!("head and tail disagree on emptiness"),
        }
    }
}

impl RecordCache for LruCache {
    fn set(&self, record: Record) {
        let mut state = self.state.lock();

        if let Some(&idx) = state.index.get(&record.id) {
            // Overwrite: same size, refreshed recency
            state.nodes[idx].record = record;
            state.promote(idx);
            return;
        }

        if state.len() >= self.capacity.get() {
            if let Some(tail) = state.tail {
                let evicted = state.remove(tail);
                debug!("LRU eviction: {}", evicted.id);
            }
        }

        state.insert_front(record);
    }

    fn get(&self, key: &str) -> Option<Record> {
        let mut state = self.state.lock();
        let idx = *state.index.get(key)?;
        state.promote(idx);
        Some(state.nodes[idx].record.clone())
    }

    fn delete(&self, key: &str) {
        let mut state = self.state.lock();
        if let Some(&idx) = state.index.get(key) {
            state.remove(idx);
        }
    }
}
