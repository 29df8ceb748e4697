//! Cache Coherency Layer
//!
//! Best-effort read-through cache with write-invalidate.
//!
//! - [`Cache`]: raw byte cache with per-entry TTL (`get` / `set` / `delete`)
//! - [`TtlCache`]: in-process implementation on `cached::stores::ExpiringSizedCache`
//! - [`RedisCache`]: shared implementation on Redis, so every service instance
//!   sees the same invalidations
//! - [`CacheLayer`]: typed JSON access used by the services; swallows and logs
//!   every cache failure so the ledger store stays the only source of truth
//! - [`keys`]: stable key scheme and default TTLs

pub mod keys;
pub mod layer;
pub mod redis_cache;
pub mod ttl;

pub use layer::{CacheLayer, CacheTtls};
pub use redis_cache::RedisCache;
pub use ttl::TtlCache;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Cache failures. Never surfaced to ledger callers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    #[error("Cache codec error: {0}")]
    Codec(String),
}

/// Byte-oriented cache backend
#[async_trait]
pub trait Cache: Send + Sync {
    /// `Ok(None)` is a miss
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError>;

    async fn delete(&self, keys: &[String]) -> Result<(), CacheError>;
}
