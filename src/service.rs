//! Record Service
//!
//! Orchestrates transform -> persist -> cache on writes and
//! cache -> store -> cache on reads.
//!
//! The cache is only ever changed after the store call for the same
//! operation has succeeded, so a failed write never leaves a record in the
//! cache that the store does not hold.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::cache::{CacheStats, RecordCache};
use crate::error::{AppError, Result};
use crate::models::Record;
use crate::store::RecordStore;
use crate::transform::TransformKind;

// == Record Service ==
pub struct RecordService {
    store: Arc<dyn RecordStore>,
    cache: Arc<dyn RecordCache>,
    stats: Mutex<CacheStats>,
}

impl RecordService {
    pub fn new(store: Arc<dyn RecordStore>, cache: Arc<dyn RecordCache>) -> Self {
        Self {
            store,
            cache,
            stats: Mutex::new(CacheStats::new()),
        }
    }

    // == Create ==
    /// Transforms `input`, persists the result under a new id and caches it.
    pub async fn create_record(
        &self,
        kind: TransformKind,
        shift: i32,
        input: &str,
    ) -> Result<Record> {
        let shift = kind.effective_shift(shift);
        let record = Record::new(kind, shift, kind.apply(input, shift));
        self.store.create(&record).await?;
        self.cache.set(record.clone());

        info!("Record created: id={}, type={}", record.id, record.kind);
        Ok(record)
    }

    // == Get ==
    /// Returns a record, answering from the cache when possible.
    ///
    /// A cache miss reads the store and, if the record exists, caches it.
    pub async fn get_record(&self, id: &str) -> Result<Record> {
        if let Some(record) = self.cache.get(id) {
            self.stats.lock().record_hit();
            debug!("Cache hit: {}", id);
            return Ok(record);
        }

        self.stats.lock().record_miss();
        debug!("Cache miss: {}", id);

        let record = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;
        self.cache.set(record.clone());
        Ok(record)
    }

    // == List ==
    /// Returns every stored record, newest first. Always reads the store.
    pub async fn list_records(&self) -> Result<Vec<Record>> {
        self.store.list().await
    }

    // == Update ==
    /// Replaces the transformation held by `id`.
    ///
    /// An unknown id is created under that id. Insert-or-replace is a single
    /// store write, so concurrent updates of a new id never collide. The
    /// cache is refreshed with the stored row.
    pub async fn update_record(
        &self,
        id: &str,
        kind: TransformKind,
        shift: i32,
        input: &str,
    ) -> Result<Record> {
        let shift = kind.effective_shift(shift);
        let candidate = Record::with_id(id, kind, shift, kind.apply(input, shift));
        let record = self.store.upsert(&candidate).await?;

        if record.updated_at.is_some() {
            info!("Record updated: id={}", id);
        } else {
            info!("Record created on update: id={}", id);
        }

        self.cache.set(record.clone());
        Ok(record)
    }

    // == Delete ==
    /// Deletes a record from the store, then purges it from the cache.
    pub async fn delete_record(&self, id: &str) -> Result<()> {
        let existed = self.store.delete(id).await?;
        self.cache.delete(id);

        if existed {
            info!("Record deleted: id={}", id);
            Ok(())
        } else {
            Err(AppError::NotFound(id.to_string()))
        }
    }

    // == Stats ==
    /// Snapshot of cache hit/miss counters.
    pub fn stats(&self) -> CacheStats {
        *self.stats.lock()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::num::NonZeroUsize;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::cache::{CacheStrategy, MapCache};
    use crate::store::SqliteStore;

    /// In-memory store that counts reads and can be told to fail writes.
    #[derive(Default)]
    struct MockStore {
        records: Mutex<HashMap<String, Record>>,
        reads: AtomicUsize,
        fail_writes: AtomicBool,
    }

    impl MockStore {
        fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }

        fn check_writable(&self) -> Result<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                Err(AppError::Storage("disk full".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl RecordStore for MockStore {
        async fn init_schema(&self) -> Result<()> {
            Ok(())
        }

        async fn create(&self, record: &Record) -> Result<()> {
            self.check_writable()?;
            self.records.lock().insert(record.id.clone(), record.clone());
            Ok(())
        }

        async fn get(&self, id: &str) -> Result<Option<Record>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(self.records.lock().get(id).cloned())
        }

        async fn list(&self) -> Result<Vec<Record>> {
            let mut records: Vec<Record> = self.records.lock().values().cloned().collect();
            records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(records)
        }

        async fn update(&self, record: &Record) -> Result<bool> {
            self.check_writable()?;
            let mut records = self.records.lock();
            if !records.contains_key(&record.id) {
                return Ok(false);
            }
            records.insert(record.id.clone(), record.clone());
            Ok(true)
        }

        async fn upsert(&self, record: &Record) -> Result<Record> {
            self.check_writable()?;
            let mut records = self.records.lock();
            let stored = match records.get(&record.id) {
                Some(existing) => Record {
                    created_at: existing.created_at,
                    updated_at: Some(record.created_at),
                    ..record.clone()
                },
                None => record.clone(),
            };
            records.insert(stored.id.clone(), stored.clone());
            Ok(stored)
        }

        async fn delete(&self, id: &str) -> Result<bool> {
            self.check_writable()?;
            Ok(self.records.lock().remove(id).is_some())
        }
    }

    fn service_with(store: Arc<MockStore>, cache: Arc<dyn RecordCache>) -> RecordService {
        RecordService::new(store, cache)
    }

    fn service_with_store(store: Arc<dyn RecordStore>) -> RecordService {
        RecordService::new(store, CacheStrategy::Map.build())
    }

    #[tokio::test]
    async fn test_create_populates_cache() {
        let store = Arc::new(MockStore::default());
        let cache = Arc::new(MapCache::new());
        let service = service_with(store.clone(), cache.clone());

        let record = service
            .create_record(TransformKind::Reverse, 0, "12345")
            .await
            .unwrap();

        assert_eq!(record.result, "54321");
        assert_eq!(cache.get(&record.id), Some(record.clone()));

        // Served from cache: the store is never read
        let fetched = service.get_record(&record.id).await.unwrap();
        assert_eq!(fetched, record);
        assert_eq!(store.reads(), 0);
        assert_eq!(service.stats().hits, 1);
    }

    #[tokio::test]
    async fn test_get_miss_falls_back_and_populates() {
        let store = Arc::new(MockStore::default());
        let seeded = Record::with_id("1111", TransformKind::Reverse, 0, "54321".into());
        store.records.lock().insert(seeded.id.clone(), seeded.clone());
        let service = service_with(store.clone(), Arc::new(MapCache::new()));

        assert_eq!(service.get_record("1111").await.unwrap(), seeded);
        assert_eq!(store.reads(), 1);

        assert_eq!(service.get_record("1111").await.unwrap(), seeded);
        assert_eq!(store.reads(), 1);

        let stats = service.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
    }

    #[tokio::test]
    async fn test_get_unknown_is_not_found() {
        let service = service_with(Arc::new(MockStore::default()), Arc::new(MapCache::new()));
        let err = service.get_record("missing").await.unwrap_err();
        assert_eq!(err, AppError::NotFound("missing".to_string()));
    }

    #[tokio::test]
    async fn test_failed_create_leaves_cache_empty() {
        let store = Arc::new(MockStore::default());
        store.fail_writes.store(true, Ordering::SeqCst);
        let cache = Arc::new(MapCache::new());
        let service = service_with(store, cache.clone());

        let err = service
            .create_record(TransformKind::Base64, 0, "Man")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Storage(_)));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_update_refreshes_cache() {
        let store = Arc::new(MockStore::default());
        let cache = Arc::new(MapCache::new());
        let service = service_with(store, cache.clone());

        let created = service
            .create_record(TransformKind::Reverse, 0, "abc")
            .await
            .unwrap();
        let updated = service
            .update_record(&created.id, TransformKind::Caesar, 1, "zab")
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.result, "abc");
        assert!(updated.updated_at.is_some());
        assert_eq!(cache.get(&created.id), Some(updated));
    }

    #[tokio::test]
    async fn test_update_unknown_id_creates_it() {
        let store = Arc::new(MockStore::default());
        let cache = Arc::new(MapCache::new());
        let service = service_with(store.clone(), cache.clone());

        let record = service
            .update_record("chosen-id", TransformKind::Base64, 0, "Man")
            .await
            .unwrap();

        assert_eq!(record.id, "chosen-id");
        assert_eq!(record.result, "TWFu");
        assert!(record.updated_at.is_none());
        assert!(store.records.lock().contains_key("chosen-id"));
        assert_eq!(cache.get("chosen-id"), Some(record));
    }

    #[tokio::test]
    async fn test_failed_update_keeps_old_cache_value() {
        let store = Arc::new(MockStore::default());
        let cache = Arc::new(MapCache::new());
        let service = service_with(store.clone(), cache.clone());

        let created = service
            .create_record(TransformKind::Reverse, 0, "abc")
            .await
            .unwrap();
        store.fail_writes.store(true, Ordering::SeqCst);

        assert!(service
            .update_record(&created.id, TransformKind::Reverse, 0, "xyz")
            .await
            .is_err());
        assert_eq!(cache.get(&created.id), Some(created));
    }

    #[tokio::test]
    async fn test_delete_purges_cache() {
        let store = Arc::new(MockStore::default());
        let cache = Arc::new(MapCache::new());
        let service = service_with(store, cache.clone());

        let created = service
            .create_record(TransformKind::Reverse, 0, "abc")
            .await
            .unwrap();
        service.delete_record(&created.id).await.unwrap();

        assert!(cache.get(&created.id).is_none());
        assert_eq!(
            service.get_record(&created.id).await.unwrap_err(),
            AppError::NotFound(created.id.clone())
        );
        assert_eq!(
            service.delete_record(&created.id).await.unwrap_err(),
            AppError::NotFound(created.id.clone())
        );
    }

    #[tokio::test]
    async fn test_list_reads_store() {
        let service = service_with(Arc::new(MockStore::default()), Arc::new(MapCache::new()));
        service
            .create_record(TransformKind::Reverse, 0, "one")
            .await
            .unwrap();
        service
            .create_record(TransformKind::Caesar, -3, "abc")
            .await
            .unwrap();

        let records = service.list_records().await.unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].created_at >= records[1].created_at);
    }

    #[tokio::test]
    async fn test_shift_dropped_for_non_caesar() {
        let cache = Arc::new(MapCache::new());
        let service = service_with(Arc::new(MockStore::default()), cache.clone());

        let created = service
            .create_record(TransformKind::Reverse, 7, "abc")
            .await
            .unwrap();
        assert_eq!(created.shift, 0);
        assert_eq!(created.result, "cba");

        let updated = service
            .update_record(&created.id, TransformKind::Base64, 4, "Man")
            .await
            .unwrap();
        assert_eq!(updated.shift, 0);
        assert_eq!(cache.get(&created.id).unwrap().shift, 0);

        let caesar = service
            .update_record(&created.id, TransformKind::Caesar, -3, "abc")
            .await
            .unwrap();
        assert_eq!(caesar.shift, -3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_of_new_id() {
        let store = SqliteStore::in_memory().await.unwrap();
        store.init_schema().await.unwrap();
        let service = Arc::new(service_with_store(Arc::new(store)));

        for n in 0..25 {
            let id = format!("fresh-{}", n);
            let (a, b) = tokio::join!(
                service.update_record(&id, TransformKind::Reverse, 0, "abc"),
                service.update_record(&id, TransformKind::Reverse, 0, "xyz"),
            );
            let a = a.unwrap();
            let b = b.unwrap();

            // Exactly one of the two writes created the row
            assert_ne!(a.updated_at.is_some(), b.updated_at.is_some());

            let stored = service.get_record(&id).await.unwrap();
            assert!(stored.result == "cba" || stored.result == "zyx");
        }

        assert_eq!(service.list_records().await.unwrap().len(), 25);
    }

    #[tokio::test]
    async fn test_lru_eviction_falls_back_to_store() {
        let store = Arc::new(MockStore::default());
        let strategy = CacheStrategy::Lru {
            capacity: NonZeroUsize::new(1).unwrap(),
        };
        let service = service_with(store.clone(), strategy.build());

        let first = service
            .create_record(TransformKind::Reverse, 0, "first")
            .await
            .unwrap();
        service
            .create_record(TransformKind::Reverse, 0, "second")
            .await
            .unwrap();

        // `first` was evicted by `second`, so this read reaches the store
        assert_eq!(service.get_record(&first.id).await.unwrap(), first);
        assert_eq!(store.reads(), 1);
    }
}
