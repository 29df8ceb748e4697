//! Shared harness: services wired to an in-memory ledger store

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use funds_ledger::account::{AccountNumberGenerator, AccountService, RandomAccountNumbers};
use funds_ledger::cache::{Cache, CacheError, CacheLayer, CacheTtls, TtlCache};
use funds_ledger::config::LedgerConfig;
use funds_ledger::ledger::MemoryLedgerStore;
use funds_ledger::transfer::{ComplianceHook, NoopHook, TransferService};

pub struct Harness {
    pub store: MemoryLedgerStore,
    pub cache: Arc<TtlCache>,
    pub accounts: AccountService,
    pub transfers: TransferService,
}

pub struct HarnessBuilder {
    operation_timeout: Duration,
    hook: Arc<dyn ComplianceHook>,
    hook_timeout: Duration,
    numbers: Arc<dyn AccountNumberGenerator>,
    cache_backend: Option<Arc<dyn Cache>>,
}

impl Default for HarnessBuilder {
    fn default() -> Self {
        Self {
            operation_timeout: Duration::from_secs(30),
            hook: Arc::new(NoopHook),
            hook_timeout: Duration::from_secs(1),
            numbers: Arc::new(RandomAccountNumbers::default()),
            cache_backend: None,
        }
    }
}

impl HarnessBuilder {
    pub fn operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    pub fn hook(mut self, hook: Arc<dyn ComplianceHook>, timeout: Duration) -> Self {
        self.hook = hook;
        self.hook_timeout = timeout;
        self
    }

    pub fn numbers(mut self, numbers: Arc<dyn AccountNumberGenerator>) -> Self {
        self.numbers = numbers;
        self
    }

    /// Replace the default `TtlCache` backend the services talk to
    pub fn cache_backend(mut self, backend: Arc<dyn Cache>) -> Self {
        self.cache_backend = Some(backend);
        self
    }

    pub fn build(self) -> Harness {
        let store = MemoryLedgerStore::new();
        let cache = Arc::new(TtlCache::new(10_000));
        let backend: Arc<dyn Cache> = self.cache_backend.unwrap_or_else(|| cache.clone());
        let layer = CacheLayer::new(backend, CacheTtls::default());

        let config = LedgerConfig {
            operation_timeout_ms: self.operation_timeout.as_millis() as u64,
            ..LedgerConfig::default()
        };

        let accounts = AccountService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            layer.clone(),
            self.numbers,
            &config,
        );
        let transfers = TransferService::new(
            Arc::new(store.clone()),
            layer,
            self.hook,
            self.operation_timeout,
            self.hook_timeout,
        );

        Harness {
            store,
            cache,
            accounts,
            transfers,
        }
    }
}

pub fn harness() -> Harness {
    HarnessBuilder::default().build()
}

/// Cache backend that fails every call
pub struct BrokenCache;

#[async_trait]
impl Cache for BrokenCache {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn set(&self, _key: &str, _value: Vec<u8>, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn delete(&self, _keys: &[String]) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }
}
