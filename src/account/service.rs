//! Account lifecycle and single-account balance operations

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::number::AccountNumberGenerator;
use crate::cache::{CacheLayer, keys};
use crate::clients::ClientDirectory;
use crate::config::LedgerConfig;
use crate::core_types::{AccountId, ClientId};
use crate::deadline::within_deadline;
use crate::error::LedgerError;
use crate::ledger::{Account, LedgerStore, StoreError};
use crate::money::validate_amount;

/// Account Lifecycle Manager plus deposit / withdraw
pub struct AccountService {
    store: Arc<dyn LedgerStore>,
    clients: Arc<dyn ClientDirectory>,
    cache: CacheLayer,
    numbers: Arc<dyn AccountNumberGenerator>,
    operation_timeout: Duration,
    max_create_attempts: u32,
}

impl AccountService {
    pub fn new(
        store: Arc<dyn LedgerStore>,
        clients: Arc<dyn ClientDirectory>,
        cache: CacheLayer,
        numbers: Arc<dyn AccountNumberGenerator>,
        config: &LedgerConfig,
    ) -> Self {
        Self {
            store,
            clients,
            cache,
            numbers,
            operation_timeout: config.operation_timeout(),
            max_create_attempts: config.max_create_attempts.max(1),
        }
    }

    /// Open a zero-balance account for an existing client.
    ///
    /// Account-number collisions are retried with a fresh number up to the
    /// configured attempt count; every other store failure is returned as-is.
    pub async fn create_account(&self, client_id: ClientId) -> Result<Account, LedgerError> {
        if client_id <= 0 {
            return Err(LedgerError::Validation("invalid client id".to_string()));
        }
        self.ensure_client(client_id).await?;

        for attempt in 1..=self.max_create_attempts {
            let number = self.numbers.generate();
            let inserted = within_deadline(
                self.operation_timeout,
                "create_account",
                self.store.insert_account(client_id, &number),
            )
            .await?;

            match inserted {
                Ok(account) => {
                    info!(
                        account_id = account.id,
                        client_id,
                        attempt,
                        "Account created"
                    );
                    self.cache
                        .invalidate(&[keys::accounts_by_client(client_id)])
                        .await;
                    self.cache
                        .set_json(
                            &keys::account(account.id),
                            &account,
                            self.cache.ttls().account,
                        )
                        .await;
                    return Ok(account);
                }
                Err(StoreError::DuplicateAccountNumber) => {
                    warn!(client_id, attempt, "Account number collision, regenerating");
                }
                Err(e) => return Err(e.into()),
            }
        }

        warn!(
            client_id,
            attempts = self.max_create_attempts,
            "Account creation exhausted account number attempts"
        );
        Err(LedgerError::CreationExhausted {
            attempts: self.max_create_attempts,
        })
    }

    /// Cached-or-fresh account projection
    pub async fn get_account(&self, id: AccountId) -> Result<Account, LedgerError> {
        if id <= 0 {
            return Err(LedgerError::Validation("invalid account id".to_string()));
        }

        let key = keys::account(id);
        if let Some(account) = self.cache.get_json::<Account>(&key).await {
            return Ok(account);
        }

        let account = within_deadline(
            self.operation_timeout,
            "get_account",
            self.store.get_account(id),
        )
        .await??
        .ok_or(LedgerError::AccountNotFound(id))?;

        self.cache
            .set_json(&key, &account, self.cache.ttls().account)
            .await;
        Ok(account)
    }

    /// Cached-or-fresh list of a client's accounts
    pub async fn list_accounts_by_client(
        &self,
        client_id: ClientId,
    ) -> Result<Vec<Account>, LedgerError> {
        if client_id <= 0 {
            return Err(LedgerError::Validation("invalid client id".to_string()));
        }
        self.ensure_client(client_id).await?;

        let key = keys::accounts_by_client(client_id);
        if let Some(accounts) = self.cache.get_json::<Vec<Account>>(&key).await {
            return Ok(accounts);
        }

        let accounts = within_deadline(
            self.operation_timeout,
            "list_accounts_by_client",
            self.store.list_accounts_by_client(client_id),
        )
        .await??;

        self.cache
            .set_json(&key, &accounts, self.cache.ttls().account_list)
            .await;
        Ok(accounts)
    }

    pub async fn deposit(&self, id: AccountId, amount: Decimal) -> Result<Account, LedgerError> {
        let amount = Self::validate(id, amount)?;
        self.apply(id, amount, "deposit").await
    }

    pub async fn withdraw(&self, id: AccountId, amount: Decimal) -> Result<Account, LedgerError> {
        let amount = Self::validate(id, amount)?;
        self.apply(id, -amount, "withdraw").await
    }

    fn validate(id: AccountId, amount: Decimal) -> Result<Decimal, LedgerError> {
        if id <= 0 {
            return Err(LedgerError::Validation("invalid account id".to_string()));
        }
        Ok(validate_amount(amount)?)
    }

    /// One constrained update in its own transaction, then invalidate.
    ///
    /// The deadline covers the update; the commit runs to completion.
    async fn apply(
        &self,
        id: AccountId,
        delta: Decimal,
        operation: &'static str,
    ) -> Result<Account, LedgerError> {
        let store = self.store.clone();
        let (tx, updated) = within_deadline(self.operation_timeout, operation, async move {
            let mut tx = store.begin().await?;
            let updated = tx.apply_delta(id, delta).await?;
            Ok::<_, StoreError>((tx, updated))
        })
        .await?
        .inspect_err(|e| debug!(account_id = id, operation, error = %e, "Balance update rejected"))?;

        tx.commit()
            .await
            .inspect_err(|e| warn!(account_id = id, operation, error = %e, "Balance update commit failed"))?;

        info!(
            account_id = id,
            operation,
            delta = %delta,
            balance = %updated.balance,
            "Balance updated"
        );

        self.cache
            .invalidate(&[
                keys::account(id),
                keys::accounts_by_client(updated.client_id),
            ])
            .await;

        Ok(updated)
    }

    async fn ensure_client(&self, client_id: ClientId) -> Result<(), LedgerError> {
        let exists = within_deadline(
            self.operation_timeout,
            "client_lookup",
            self.clients.client_exists(client_id),
        )
        .await??;

        if exists {
            Ok(())
        } else {
            Err(LedgerError::ClientNotFound(client_id))
        }
    }
}
