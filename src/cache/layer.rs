//! Typed, best-effort access to the cache backend.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::keys::{ACCOUNT_LIST_TTL, ACCOUNT_TTL};
use super::{Cache, CacheError};

/// TTLs applied when populating the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    pub account: Duration,
    pub account_list: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            account: ACCOUNT_TTL,
            account_list: ACCOUNT_LIST_TTL,
        }
    }
}

/// Read-through / write-invalidate front for an optional [`Cache`].
///
/// No method returns an error: a failed read is a miss, a failed write or
/// invalidation is logged and the caller carries on against the store.
#[derive(Clone)]
pub struct CacheLayer {
    backend: Option<Arc<dyn Cache>>,
    ttls: CacheTtls,
}

impl CacheLayer {
    pub fn new(backend: Arc<dyn Cache>, ttls: CacheTtls) -> Self {
        Self {
            backend: Some(backend),
            ttls,
        }
    }

    /// Layer that never caches
    pub fn disabled() -> Self {
        Self {
            backend: None,
            ttls: CacheTtls::default(),
        }
    }

    pub fn ttls(&self) -> CacheTtls {
        self.ttls
    }

    /// Cached value for `key`, or `None` on miss, backend error or undecodable entry
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let backend = self.backend.as_ref()?;

        let bytes = match backend.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!(key, "[cache] miss");
                return None;
            }
            Err(e) => {
                warn!(key, error = %e, "[cache] read failed, falling through to store");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => {
                debug!(key, "[cache] hit");
                Some(value)
            }
            Err(e) => {
                warn!(key, error = %CacheError::Codec(e.to_string()), "[cache] undecodable entry");
                None
            }
        }
    }

    /// Populate `key`; failures are logged only
    pub async fn set_json<T: Serialize + Sync>(&self, key: &str, value: &T, ttl: Duration) {
        let Some(backend) = self.backend.as_ref() else {
            return;
        };

        let bytes = match serde_json::to_vec(value) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(key, error = %e, "[cache] failed to encode value");
                return;
            }
        };

        if let Err(e) = backend.set(key, bytes, ttl).await {
            warn!(key, error = %e, "[cache] write failed");
        }
    }

    /// Delete `keys`; failures are logged only.
    ///
    /// A lost invalidation leaves a stale entry for at most its TTL.
    pub async fn invalidate(&self, keys: &[String]) {
        let Some(backend) = self.backend.as_ref() else {
            return;
        };

        if let Err(e) = backend.delete(keys).await {
            warn!(keys = ?keys, error = %e, "[cache] invalidation failed, entries may be stale until TTL");
        }
    }
}
