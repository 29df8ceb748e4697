//! Client existence lookup
//!
//! Client profiles are managed elsewhere; the ledger only needs to know
//! whether an owning client exists before it opens an account for it.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::core_types::ClientId;
use crate::ledger::StoreError;

/// Client-existence collaborator
#[async_trait]
pub trait ClientDirectory: Send + Sync {
    async fn client_exists(&self, client_id: ClientId) -> Result<bool, StoreError>;
}

/// Looks clients up in the `clients` table
pub struct PgClientDirectory {
    pool: PgPool,
}

impl PgClientDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClientDirectory for PgClientDirectory {
    async fn client_exists(&self, client_id: ClientId) -> Result<bool, StoreError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM clients WHERE id = $1)")
                .bind(client_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }
}
