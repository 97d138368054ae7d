//! Response DTOs for the records API
//!
//! Defines the structure of outgoing HTTP response bodies that are not
//! plain records.

use serde::Serialize;

use crate::cache::{CacheStats, CacheStrategy};

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Configured cache strategy ("lru" or "map")
    pub strategy: String,
    /// LRU capacity, absent for the unbounded map cache
    pub capacity: Option<usize>,
    /// Number of reads served from the cache
    pub hits: u64,
    /// Number of reads that fell through to the store
    pub misses: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from the strategy and a stats snapshot
    pub fn new(strategy: &CacheStrategy, stats: &CacheStats) -> Self {
        Self {
            strategy: strategy.name().to_string(),
            capacity: strategy.capacity(),
            hits: stats.hits,
            misses: stats.misses,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
