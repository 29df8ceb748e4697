//! Ledger store error types

use thiserror::Error;

use crate::core_types::{AccountId, ClientId};

/// Errors reported by a [`LedgerStore`](super::LedgerStore) or one of its transactions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("Client not found: {0}")]
    ClientNotFound(ClientId),

    /// The constrained update would have driven the balance below zero
    #[error("Insufficient funds in account {0}")]
    InsufficientFunds(AccountId),

    /// The resulting balance would not fit the stored column
    #[error("Balance out of range in account {0}")]
    BalanceOutOfRange(AccountId),

    #[error("Account number already exists")]
    DuplicateAccountNumber,

    /// Connection, lock, serialization or commit failure
    #[error("Store backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}
