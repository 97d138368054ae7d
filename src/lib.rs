//! Transform Records - CRUD service for text-transformation records
//!
//! Stores reverse / Caesar / Base64 results in SQLite and serves reads through
//! an in-process LRU or map cache.

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;
pub mod transform;

pub use api::AppState;
pub use config::Config;
pub use service::RecordService;
