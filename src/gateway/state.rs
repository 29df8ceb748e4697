use std::sync::Arc;

use crate::account::AccountService;
use crate::db::Database;
use crate::transfer::TransferService;

/// Shared gateway state
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub transfers: Arc<TransferService>,
    /// PostgreSQL pool, when the ledger runs on PostgreSQL (used by health checks)
    pub pg_db: Option<Arc<Database>>,
    /// Ledger backend name, reported by the health endpoint
    pub backend: &'static str,
    /// Cache backend name (`memory`, `redis` or `disabled`)
    pub cache_backend: &'static str,
}

impl AppState {
    pub fn new(
        accounts: Arc<AccountService>,
        transfers: Arc<TransferService>,
        pg_db: Option<Arc<Database>>,
        backend: &'static str,
        cache_backend: &'static str,
    ) -> Self {
        Self {
            accounts,
            transfers,
            pg_db,
            backend,
            cache_backend,
        }
    }
}
