//! Transfer Coordinator
//!
//! Moves funds between two accounts in one store transaction.
//!
//! # Flow
//!
//! ```text
//! validate → begin → lock min(id) → lock max(id) → check source balance
//!          → debit → credit → insert record → commit
//!          → invalidate cache → compliance hook
//! ```
//!
//! Rows are always locked in ascending ID order, so two opposing transfers
//! between the same pair of accounts serialize instead of deadlocking.
//! Everything before `commit` runs under the operation deadline; if it fires the
//! open transaction is dropped and rolled back. `commit` itself is awaited to
//! completion: once COMMIT is sent its outcome is reported, never abandoned.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::hook::ComplianceHook;
use crate::cache::{CacheLayer, keys};
use crate::core_types::AccountId;
use crate::deadline::within_deadline;
use crate::error::LedgerError;
use crate::ledger::{Account, LedgerStore, LedgerTx, StoreError, TransferRecord};
use crate::money::validate_amount;

/// Page size used when the caller asks for none or too many
pub const DEFAULT_PAGE_LIMIT: i64 = 50;
/// Largest page a caller may request
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// Locked section done, writes staged in `tx` and not yet committed
struct Staged {
    tx: Box<dyn LedgerTx>,
    record: TransferRecord,
    from: Account,
    to: Account,
}

pub struct TransferService {
    store: Arc<dyn LedgerStore>,
    cache: CacheLayer,
    hook: Arc<dyn ComplianceHook>,
    operation_timeout: Duration,
    hook_timeout: Duration,
}

impl TransferService {
    pub fn new(
        store: Arc<dyn LedgerStore>,
        cache: CacheLayer,
        hook: Arc<dyn ComplianceHook>,
        operation_timeout: Duration,
        hook_timeout: Duration,
    ) -> Self {
        Self {
            store,
            cache,
            hook,
            operation_timeout,
            hook_timeout,
        }
    }

    /// Move `amount` from `from` to `to` atomically.
    ///
    /// # Errors
    /// * `Validation` - same account on both legs, bad ID or bad amount
    /// * `AccountNotFound` - either account is missing
    /// * `InsufficientFunds` - source balance below `amount`
    /// * `Conflict` - deadline exceeded before commit, or the store failed; nothing was written
    pub async fn transfer(
        &self,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<TransferRecord, LedgerError> {
        if from <= 0 || to <= 0 {
            return Err(LedgerError::Validation("invalid account id".to_string()));
        }
        if from == to {
            return Err(LedgerError::Validation(
                "cannot transfer to the same account".to_string(),
            ));
        }
        let amount = validate_amount(amount)?;

        let store = self.store.clone();
        let staged = within_deadline(
            self.operation_timeout,
            "transfer",
            Self::execute(store, from, to, amount),
        )
        .await?
        .inspect_err(|e| debug!(from, to, error = %e, "Transfer rejected"))?;

        let Staged {
            tx,
            record,
            from,
            to,
        } = staged;
        tx.commit()
            .await
            .inspect_err(|e| warn!(transfer_id = %record.id, error = %e, "Transfer commit failed"))?;

        info!(
            transfer_id = %record.id,
            from_account_id = from.id,
            to_account_id = to.id,
            amount = %record.amount,
            "Transfer committed"
        );

        let mut stale = vec![
            keys::account(from.id),
            keys::account(to.id),
            keys::accounts_by_client(from.client_id),
        ];
        if to.client_id != from.client_id {
            stale.push(keys::accounts_by_client(to.client_id));
        }
        self.cache.invalidate(&stale).await;

        self.run_hook(&record).await;
        Ok(record)
    }

    async fn execute(
        store: Arc<dyn LedgerStore>,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<Staged, StoreError> {
        let mut tx = store.begin().await?;

        let (first, second) = if from < to { (from, to) } else { (to, from) };
        tx.lock_account(first).await?;
        tx.lock_account(second).await?;

        // Re-read under the lock; an earlier unlocked read may be stale
        let source = tx.lock_account(from).await?;
        if source.balance < amount {
            return Err(StoreError::InsufficientFunds(from));
        }

        let from_after = tx.apply_delta(from, -amount).await?;
        let to_after = tx.apply_delta(to, amount).await?;
        let record = tx.insert_transfer(from, to, amount).await?;

        Ok(Staged {
            tx,
            record,
            from: from_after,
            to: to_after,
        })
    }

    async fn run_hook(&self, record: &TransferRecord) {
        match tokio::time::timeout(self.hook_timeout, self.hook.verify(record)).await {
            Ok(Ok(())) => {
                debug!(transfer_id = %record.id, hook = self.hook.name(), "Compliance hook passed");
            }
            Ok(Err(e)) => {
                warn!(
                    transfer_id = %record.id,
                    hook = self.hook.name(),
                    error = %e,
                    "Compliance hook failed after commit"
                );
            }
            Err(_) => {
                warn!(
                    transfer_id = %record.id,
                    hook = self.hook.name(),
                    timeout_ms = self.hook_timeout.as_millis() as u64,
                    "Compliance hook timed out after commit"
                );
            }
        }
    }

    /// Transfers touching `account_id`, newest first.
    ///
    /// `limit` outside `1..=1000` becomes 50; a negative `offset` becomes 0.
    pub async fn list_transfers(
        &self,
        account_id: AccountId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TransferRecord>, LedgerError> {
        if account_id <= 0 {
            return Err(LedgerError::Validation("invalid account id".to_string()));
        }
        let limit = if limit <= 0 || limit > MAX_PAGE_LIMIT {
            DEFAULT_PAGE_LIMIT
        } else {
            limit
        };
        let offset = offset.max(0);

        let store = self.store.clone();
        within_deadline(self.operation_timeout, "list_transfers", async move {
            if store.get_account(account_id).await?.is_none() {
                return Err(StoreError::AccountNotFound(account_id));
            }
            store
                .list_transfers_by_account(account_id, limit, offset)
                .await
        })
        .await?
        .map_err(LedgerError::from)
    }
}
