//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::num::NonZeroUsize;

use tracing::warn;

use crate::cache::CacheStrategy;

const DEFAULT_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1000) {
    Some(capacity) => capacity,
    None => unreachable!(),
};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// SQLite database file, or `:memory:`
    pub database_path: String,
    /// Cache implementation and, for LRU, its capacity
    pub cache: CacheStrategy,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `DATABASE_PATH` - SQLite database path (default: records.db)
    /// - `CACHE_STRATEGY` - `lru` or `map` (default: lru)
    /// - `CACHE_CAPACITY` - LRU capacity, at least 1 (default: 1000)
    pub fn from_env() -> Self {
        let capacity = env::var("CACHE_CAPACITY")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .and_then(NonZeroUsize::new)
            .unwrap_or(DEFAULT_CACHE_CAPACITY);

        let cache = match env::var("CACHE_STRATEGY") {
            Ok(name) => CacheStrategy::from_name(&name, capacity).unwrap_or_else(|| {
                warn!("Unknown CACHE_STRATEGY '{}', falling back to lru", name);
                CacheStrategy::Lru { capacity }
            }),
            Err(_) => CacheStrategy::Lru { capacity },
        };

        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "records.db".to_string()),
            cache,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            database_path: "records.db".to_string(),
            cache: CacheStrategy::Lru {
                capacity: DEFAULT_CACHE_CAPACITY,
            },
        }
    }
}
