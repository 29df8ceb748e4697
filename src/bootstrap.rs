//! Service wiring from [`AppConfig`]
//!
//! ```text
//! postgres.url set?  ── yes ──▶ PgLedgerStore + PgClientDirectory
//!        │
//!        no ──▶ MemoryLedgerStore (+ ledger.seed_clients registered)
//!
//! cache.enabled?     ── no ──▶ CacheLayer::disabled()
//!        │
//!        yes ──▶ backend: memory ▶ TtlCache
//!                backend: redis  ▶ RedisCache (cache.redis_url)
//! ```

use std::sync::Arc;

use anyhow::Context;

use crate::account::{AccountService, RandomAccountNumbers};
use crate::cache::{CacheLayer, RedisCache, TtlCache};
use crate::clients::{ClientDirectory, PgClientDirectory};
use crate::config::{AppConfig, CacheBackend, CacheConfig, LedgerConfig, PostgresConfig};
use crate::db::Database;
use crate::gateway::state::AppState;
use crate::ledger::{LedgerStore, MemoryLedgerStore, PgLedgerStore};
use crate::transfer::{TransferService, hook_from_config};

/// Selected ledger backend
pub struct LedgerBackend {
    pub store: Arc<dyn LedgerStore>,
    pub clients: Arc<dyn ClientDirectory>,
    pub pg_db: Option<Arc<Database>>,
}

/// Connect the configured ledger store.
///
/// Without `postgres.url` the in-memory store is used and every
/// `ledger.seed_clients` entry is registered on it.
pub async fn ledger_backend(
    postgres: &PostgresConfig,
    ledger: &LedgerConfig,
) -> anyhow::Result<LedgerBackend> {
    match postgres.url.as_deref() {
        Some(url) => {
            let db = Database::connect(url, postgres.max_connections, postgres.acquire_timeout_ms)
                .await
                .context("Failed to connect to PostgreSQL")?;
            if postgres.init_schema {
                crate::db::schema::init_schema(db.pool()).await?;
            }
            if !ledger.seed_clients.is_empty() {
                tracing::warn!("ledger.seed_clients is ignored on PostgreSQL");
            }
            let pool = db.pool().clone();
            Ok(LedgerBackend {
                store: Arc::new(PgLedgerStore::new(pool.clone())),
                clients: Arc::new(PgClientDirectory::new(pool)),
                pg_db: Some(Arc::new(db)),
            })
        }
        None => {
            tracing::warn!("No postgres.url configured, using in-memory ledger store");
            let memory = MemoryLedgerStore::new();
            for &client_id in &ledger.seed_clients {
                anyhow::ensure!(client_id > 0, "invalid seed client id {}", client_id);
                memory.register_client(client_id)?;
            }
            if !ledger.seed_clients.is_empty() {
                tracing::info!(
                    clients = ?ledger.seed_clients,
                    "Registered seed clients on in-memory store"
                );
            }
            Ok(LedgerBackend {
                store: Arc::new(memory.clone()),
                clients: Arc::new(memory),
                pg_db: None,
            })
        }
    }
}

/// Build the cache layer; returns it with the backend name for health reports
pub async fn cache_layer(config: &CacheConfig) -> anyhow::Result<(CacheLayer, &'static str)> {
    if !config.enabled {
        tracing::info!("Account cache disabled");
        return Ok((CacheLayer::disabled(), "disabled"));
    }

    match config.backend {
        CacheBackend::Memory => Ok((
            CacheLayer::new(Arc::new(TtlCache::new(config.max_entries)), config.ttls()),
            "memory",
        )),
        CacheBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .context("cache.backend is redis but no cache.redis_url or REDIS_URL is set")?;
            let redis = RedisCache::connect(url)
                .await
                .context("Failed to connect to Redis")?;
            redis.ping().await.context("Redis PING failed")?;
            Ok((CacheLayer::new(Arc::new(redis), config.ttls()), "redis"))
        }
    }
}

/// Wire stores, cache, hook and services into the gateway state
pub async fn build_state(config: &AppConfig) -> anyhow::Result<Arc<AppState>> {
    let backend = ledger_backend(&config.postgres, &config.ledger).await?;
    tracing::info!(backend = backend.store.name(), "Ledger store ready");

    let (cache, cache_backend) = cache_layer(&config.cache).await?;
    tracing::info!(cache = cache_backend, "Account cache ready");

    let hook = hook_from_config(&config.compliance);
    tracing::info!(hook = hook.name(), "Compliance hook configured");

    let ledger_config = &config.ledger;
    let accounts = Arc::new(AccountService::new(
        backend.store.clone(),
        backend.clients,
        cache.clone(),
        Arc::new(RandomAccountNumbers::new(ledger_config.account_number_length)),
        ledger_config,
    ));
    let transfers = Arc::new(TransferService::new(
        backend.store.clone(),
        cache,
        hook,
        ledger_config.operation_timeout(),
        config.compliance.timeout(),
    ));

    Ok(Arc::new(AppState::new(
        accounts,
        transfers,
        backend.pg_db,
        backend.store.name(),
        cache_backend,
    )))
}
