//! In-memory ledger store
//!
//! Mirrors the PostgreSQL semantics the services rely on:
//! - one async mutex per account row, held by a transaction until it ends
//! - writes are staged in the transaction and published atomically on commit
//! - dropping a transaction discards its writes and releases its row locks
//! - `insert_account` enforces the client foreign key and account-number uniqueness
//!
//! Used as the development backend when no PostgreSQL URL is configured and
//! by the test suite.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use rust_decimal::Decimal;
use tokio::sync::OwnedMutexGuard;

use super::error::StoreError;
use super::models::{Account, TransferRecord};
use super::{LedgerStore, LedgerTx};
use crate::clients::ClientDirectory;
use crate::core_types::{AccountId, ClientId};

#[derive(Default)]
struct Tables {
    clients: HashSet<ClientId>,
    accounts: BTreeMap<AccountId, Account>,
    account_numbers: HashSet<String>,
    transfers: Vec<TransferRecord>,
    last_account_id: AccountId,
}

#[derive(Default)]
struct Inner {
    tables: Mutex<Tables>,
    row_locks: DashMap<AccountId, Arc<tokio::sync::Mutex<()>>>,
    fail_next_commit: AtomicBool,
    commit_latency_ms: AtomicU64,
}

impl Inner {
    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Backend("ledger tables lock poisoned".to_string()))
    }

    fn committed(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.tables()?.accounts.get(&id).cloned())
    }

    fn row_lock(&self, id: AccountId) -> Arc<tokio::sync::Mutex<()>> {
        self.row_locks
            .entry(id)
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}

/// In-process [`LedgerStore`] and [`ClientDirectory`]
#[derive(Clone, Default)]
pub struct MemoryLedgerStore {
    inner: Arc<Inner>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a client so accounts can be created for it
    pub fn register_client(&self, client_id: ClientId) -> Result<(), StoreError> {
        self.inner.tables()?.clients.insert(client_id);
        Ok(())
    }

    /// Insert an account with an opening balance, bypassing the lifecycle manager.
    ///
    /// The client is registered implicitly.
    pub fn seed_account(&self, client_id: ClientId, balance: Decimal) -> Result<Account, StoreError> {
        if balance < Decimal::ZERO {
            return Err(StoreError::InsufficientFunds(0));
        }

        let mut balance = balance;
        balance.rescale(crate::money::MONEY_SCALE);

        let mut tables = self.inner.tables()?;
        tables.clients.insert(client_id);
        tables.last_account_id += 1;
        let id = tables.last_account_id;
        let account = Account {
            id,
            client_id,
            account_number: format!("{:016}", id),
            balance,
            created_at: Utc::now(),
        };
        tables.account_numbers.insert(account.account_number.clone());
        tables.accounts.insert(id, account.clone());
        Ok(account)
    }

    /// Make the next commit fail with a backend error (the transaction is rolled back).
    pub fn fail_next_commit(&self) {
        self.inner.fail_next_commit.store(true, Ordering::SeqCst);
    }

    /// Delay every commit by `latency` before its writes are published,
    /// like a slow COMMIT round-trip.
    pub fn set_commit_latency(&self, latency: Duration) {
        self.inner
            .commit_latency_ms
            .store(latency.as_millis() as u64, Ordering::SeqCst);
    }

    /// Every committed transfer record, oldest first
    pub fn transfers(&self) -> Result<Vec<TransferRecord>, StoreError> {
        Ok(self.inner.tables()?.transfers.clone())
    }

    /// Sum of all committed balances
    pub fn total_balance(&self) -> Result<Decimal, StoreError> {
        Ok(self
            .inner
            .tables()?
            .accounts
            .values()
            .map(|a| a.balance)
            .sum())
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn begin(&self) -> Result<Box<dyn LedgerTx>, StoreError> {
        Ok(Box::new(MemoryLedgerTx {
            inner: self.inner.clone(),
            guards: HashMap::new(),
            staged: HashMap::new(),
            transfers: Vec::new(),
        }))
    }

    async fn get_account(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        self.inner.committed(id)
    }

    async fn list_accounts_by_client(
        &self,
        client_id: ClientId,
    ) -> Result<Vec<Account>, StoreError> {
        Ok(self
            .inner
            .tables()?
            .accounts
            .values()
            .filter(|a| a.client_id == client_id)
            .cloned()
            .collect())
    }

    async fn insert_account(
        &self,
        client_id: ClientId,
        account_number: &str,
    ) -> Result<Account, StoreError> {
        let mut tables = self.inner.tables()?;

        if !tables.clients.contains(&client_id) {
            return Err(StoreError::ClientNotFound(client_id));
        }
        if tables.account_numbers.contains(account_number) {
            return Err(StoreError::DuplicateAccountNumber);
        }

        tables.last_account_id += 1;
        let account = Account {
            id: tables.last_account_id,
            client_id,
            account_number: account_number.to_string(),
            balance: crate::money::zero(),
            created_at: Utc::now(),
        };
        tables.account_numbers.insert(account.account_number.clone());
        tables.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn list_transfers_by_account(
        &self,
        account_id: AccountId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TransferRecord>, StoreError> {
        Ok(self
            .inner
            .tables()?
            .transfers
            .iter()
            .rev()
            .filter(|t| t.involves(account_id))
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ClientDirectory for MemoryLedgerStore {
    async fn client_exists(&self, client_id: ClientId) -> Result<bool, StoreError> {
        Ok(self.inner.tables()?.clients.contains(&client_id))
    }
}

/// Open in-memory transaction.
pub struct MemoryLedgerTx {
    inner: Arc<Inner>,
    guards: HashMap<AccountId, OwnedMutexGuard<()>>,
    staged: HashMap<AccountId, Account>,
    transfers: Vec<TransferRecord>,
}

impl MemoryLedgerTx {
    fn current(&self, id: AccountId) -> Result<Account, StoreError> {
        match self.staged.get(&id) {
            Some(account) => Ok(account.clone()),
            None => self
                .inner
                .committed(id)?
                .ok_or(StoreError::AccountNotFound(id)),
        }
    }
}

#[async_trait]
impl LedgerTx for MemoryLedgerTx {
    async fn lock_account(&mut self, id: AccountId) -> Result<Account, StoreError> {
        if !self.guards.contains_key(&id) {
            // Accounts are never deleted, so existence checked before waiting still holds after
            if self.inner.committed(id)?.is_none() {
                return Err(StoreError::AccountNotFound(id));
            }
            let lock = self.inner.row_lock(id);
            let guard = lock.lock_owned().await;
            self.guards.insert(id, guard);
        }
        self.current(id)
    }

    async fn apply_delta(&mut self, id: AccountId, delta: Decimal) -> Result<Account, StoreError> {
        let mut account = self.lock_account(id).await?;

        let next = account
            .balance
            .checked_add(delta)
            .ok_or(StoreError::BalanceOutOfRange(id))?;
        if next < Decimal::ZERO {
            return Err(StoreError::InsufficientFunds(id));
        }
        if !crate::money::within_limit(next) {
            return Err(StoreError::BalanceOutOfRange(id));
        }

        account.balance = next;
        self.staged.insert(id, account.clone());
        Ok(account)
    }

    async fn insert_transfer(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<TransferRecord, StoreError> {
        let record = TransferRecord {
            id: ulid::Ulid::new().to_string(),
            from_account_id: from,
            to_account_id: to,
            amount,
            created_at: Utc::now(),
        };
        self.transfers.push(record.clone());
        Ok(record)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let mut this = self;

        if this.inner.fail_next_commit.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Backend("injected commit failure".to_string()));
        }

        let latency_ms = this.inner.commit_latency_ms.load(Ordering::SeqCst);
        if latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(latency_ms)).await;
        }

        {
            let mut tables = this.inner.tables()?;
            for (id, account) in this.staged.drain() {
                tables.accounts.insert(id, account);
            }
            tables.transfers.append(&mut this.transfers);
        }

        // Row locks are released when `this` drops, after the writes are visible
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_commit_publishes_staged_writes() {
        let store = MemoryLedgerStore::new();
        let account = store.seed_account(1, Decimal::from(10)).unwrap();

        let mut tx = store.begin().await.unwrap();
        let updated = tx.apply_delta(account.id, Decimal::from(5)).await.unwrap();
        assert_eq!(updated.balance, Decimal::from(15));

        // Not visible before commit
        let before = store.get_account(account.id).await.unwrap().unwrap();
        assert_eq!(before.balance, Decimal::from(10));

        tx.commit().await.unwrap();
        let after = store.get_account(account.id).await.unwrap().unwrap();
        assert_eq!(after.balance, Decimal::from(15));
    }

    #[tokio::test]
    async fn test_drop_rolls_back_and_releases_lock() {
        let store = MemoryLedgerStore::new();
        let account = store.seed_account(1, Decimal::from(10)).unwrap();

        {
            let mut tx = store.begin().await.unwrap();
            tx.apply_delta(account.id, Decimal::from(-10)).await.unwrap();
            tx.insert_transfer(account.id, 99, Decimal::from(10))
                .await
                .unwrap();
        }

        let stored = store.get_account(account.id).await.unwrap().unwrap();
        assert_eq!(stored.balance, Decimal::from(10));
        assert!(store.transfers().unwrap().is_empty());

        // Lock must be free again
        let mut tx = store.begin().await.unwrap();
        let locked = tokio::time::timeout(Duration::from_secs(1), tx.lock_account(account.id))
            .await
            .expect("row lock was not released");
        assert!(locked.is_ok());
    }

    #[tokio::test]
    async fn test_row_lock_blocks_second_transaction() {
        let store = MemoryLedgerStore::new();
        let account = store.seed_account(1, Decimal::from(10)).unwrap();

        let mut first = store.begin().await.unwrap();
        first.lock_account(account.id).await.unwrap();

        let mut second = store.begin().await.unwrap();
        let blocked =
            tokio::time::timeout(Duration::from_millis(50), second.lock_account(account.id)).await;
        assert!(blocked.is_err(), "second lock should wait for the first");

        first.commit().await.unwrap();
        let acquired =
            tokio::time::timeout(Duration::from_secs(1), second.lock_account(account.id)).await;
        assert!(acquired.is_ok());
    }

    #[tokio::test]
    async fn test_constrained_update_rejects_negative_balance() {
        let store = MemoryLedgerStore::new();
        let account = store.seed_account(1, Decimal::from(30)).unwrap();

        let mut tx = store.begin().await.unwrap();
        let err = tx
            .apply_delta(account.id, Decimal::from(-40))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::InsufficientFunds(account.id));

        // Exactly zero is allowed
        let drained = tx.apply_delta(account.id, Decimal::from(-30)).await.unwrap();
        assert_eq!(drained.balance, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_constrained_update_rejects_out_of_range_balance() {
        let store = MemoryLedgerStore::new();
        let account = store
            .seed_account(1, Decimal::from(crate::money::AMOUNT_LIMIT - 1))
            .unwrap();

        let mut tx = store.begin().await.unwrap();
        assert_eq!(
            tx.apply_delta(account.id, Decimal::ONE).await.unwrap_err(),
            StoreError::BalanceOutOfRange(account.id)
        );
        assert_eq!(
            tx.apply_delta(account.id, Decimal::MAX).await.unwrap_err(),
            StoreError::BalanceOutOfRange(account.id)
        );

        let kept = tx.apply_delta(account.id, Decimal::new(99, 2)).await.unwrap();
        assert_eq!(kept.balance.to_string(), "999999999999999999.99");
    }

    #[tokio::test]
    async fn test_missing_account() {
        let store = MemoryLedgerStore::new();
        let mut tx = store.begin().await.unwrap();
        assert_eq!(
            tx.lock_account(42).await.unwrap_err(),
            StoreError::AccountNotFound(42)
        );
        assert_eq!(
            tx.apply_delta(42, Decimal::ONE).await.unwrap_err(),
            StoreError::AccountNotFound(42)
        );
    }

    #[tokio::test]
    async fn test_insert_account_constraints() {
        let store = MemoryLedgerStore::new();

        assert_eq!(
            store.insert_account(7, "1234567890123456").await.unwrap_err(),
            StoreError::ClientNotFound(7)
        );

        store.register_client(7).unwrap();
        let account = store.insert_account(7, "1234567890123456").await.unwrap();
        assert_eq!(account.balance, Decimal::ZERO);
        assert_eq!(account.client_id, 7);

        assert_eq!(
            store.insert_account(7, "1234567890123456").await.unwrap_err(),
            StoreError::DuplicateAccountNumber
        );
        assert!(store.client_exists(7).await.unwrap());
        assert!(!store.client_exists(8).await.unwrap());
    }

    #[tokio::test]
    async fn test_injected_commit_failure_rolls_back() {
        let store = MemoryLedgerStore::new();
        let account = store.seed_account(1, Decimal::from(10)).unwrap();
        store.fail_next_commit();

        let mut tx = store.begin().await.unwrap();
        tx.apply_delta(account.id, Decimal::from(5)).await.unwrap();
        assert!(matches!(tx.commit().await, Err(StoreError::Backend(_))));

        let stored = store.get_account(account.id).await.unwrap().unwrap();
        assert_eq!(stored.balance, Decimal::from(10));
    }

    #[tokio::test]
    async fn test_commit_latency_delays_publication() {
        let store = MemoryLedgerStore::new();
        let account = store.seed_account(1, Decimal::from(10)).unwrap();
        store.set_commit_latency(Duration::from_millis(50));

        let mut tx = store.begin().await.unwrap();
        tx.apply_delta(account.id, Decimal::from(5)).await.unwrap();
        let started = std::time::Instant::now();
        tx.commit().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(50));

        let stored = store.get_account(account.id).await.unwrap().unwrap();
        assert_eq!(stored.balance, Decimal::from(15));
    }

    #[tokio::test]
    async fn test_list_transfers_newest_first_with_paging() {
        let store = MemoryLedgerStore::new();
        let a = store.seed_account(1, Decimal::from(100)).unwrap();
        let b = store.seed_account(2, Decimal::ZERO).unwrap();

        for amount in 1..=3 {
            let mut tx = store.begin().await.unwrap();
            tx.insert_transfer(a.id, b.id, Decimal::from(amount))
                .await
                .unwrap();
            tx.commit().await.unwrap();
        }

        let page = store.list_transfers_by_account(b.id, 2, 0).await.unwrap();
        let amounts: Vec<Decimal> = page.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![Decimal::from(3), Decimal::from(2)]);

        let rest = store.list_transfers_by_account(a.id, 2, 2).await.unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].amount, Decimal::from(1));
    }
}
