//! Ledger Store
//!
//! Transactional persistence for accounts and immutable transfer records.
//!
//! # Contract
//!
//! - Reads outside a transaction see committed state only.
//! - [`LedgerTx::lock_account`] takes an exclusive row lock held until the
//!   transaction commits or is dropped.
//! - [`LedgerTx::apply_delta`] is the constrained atomic update: the delta is
//!   applied only if `balance + delta >= 0`, evaluated by the store in the same
//!   step as the write. It implicitly locks the row, like `UPDATE` does.
//! - Dropping a [`LedgerTx`] without calling [`LedgerTx::commit`] rolls it back.
//!   Cancelling an operation future therefore never leaves partial effects.
//!
//! # Backends
//!
//! - [`PgLedgerStore`]: PostgreSQL via sqlx (`SELECT ... FOR UPDATE`,
//!   `UPDATE ... WHERE balance + $1 >= 0`)
//! - [`MemoryLedgerStore`]: in-process store with per-row async locks

pub mod error;
pub mod memory;
pub mod models;
pub mod postgres;

pub use error::StoreError;
pub use memory::MemoryLedgerStore;
pub use models::{Account, TransferRecord};
pub use postgres::PgLedgerStore;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::core_types::{AccountId, ClientId};

/// Storage backend for accounts and transfer records.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Backend name for logging
    fn name(&self) -> &'static str;

    /// Start a transaction
    async fn begin(&self) -> Result<Box<dyn LedgerTx>, StoreError>;

    /// Committed snapshot of one account
    async fn get_account(&self, id: AccountId) -> Result<Option<Account>, StoreError>;

    /// Committed snapshots of all accounts owned by a client, ordered by ID
    async fn list_accounts_by_client(&self, client_id: ClientId)
    -> Result<Vec<Account>, StoreError>;

    /// Insert a new zero-balance account.
    ///
    /// # Errors
    /// * `DuplicateAccountNumber` - `account_number` is already taken
    /// * `ClientNotFound` - the owning client row does not exist
    async fn insert_account(
        &self,
        client_id: ClientId,
        account_number: &str,
    ) -> Result<Account, StoreError>;

    /// Transfer records where the account is either leg, newest first
    async fn list_transfers_by_account(
        &self,
        account_id: AccountId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TransferRecord>, StoreError>;
}

/// One open store transaction.
#[async_trait]
pub trait LedgerTx: Send {
    /// Acquire an exclusive row lock and return the row as seen under the lock.
    ///
    /// Re-locking a row already held by this transaction is a no-op.
    async fn lock_account(&mut self, id: AccountId) -> Result<Account, StoreError>;

    /// Apply `delta` to the balance iff the result stays non-negative.
    ///
    /// # Errors
    /// * `AccountNotFound` - no such account, nothing written
    /// * `InsufficientFunds` - `balance + delta < 0`, nothing written
    async fn apply_delta(&mut self, id: AccountId, delta: Decimal) -> Result<Account, StoreError>;

    /// Append a transfer record; the store assigns its ID and timestamp.
    async fn insert_transfer(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<TransferRecord, StoreError>;

    /// Make every write of this transaction visible atomically and release its locks.
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}
