//! Ledger Error Types
//!
//! Every failure a caller can observe is one of five kinds: validation,
//! not-found, insufficient funds, creation exhausted (duplicate resource) or
//! conflict (transient store failure). Cache failures never appear here.

use thiserror::Error;

use crate::core_types::{AccountId, ClientId};
use crate::ledger::StoreError;
use crate::money::MoneyError;

/// Errors returned by the account and transfer services
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    // === Validation Errors (detected before any I/O) ===
    #[error("Validation failed: {0}")]
    Validation(String),

    // === Lookup Errors ===
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("Client not found: {0}")]
    ClientNotFound(ClientId),

    // === Invariant Errors ===
    #[error("Insufficient funds in account {0}")]
    InsufficientFunds(AccountId),

    // === Duplicate Resource Errors ===
    #[error("Could not allocate a unique account number after {attempts} attempts")]
    CreationExhausted { attempts: u32 },

    // === Transient Errors (not retried here; retry policy belongs to the caller) ===
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl LedgerError {
    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::Validation(_) => "VALIDATION_ERROR",
            LedgerError::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            LedgerError::ClientNotFound(_) => "CLIENT_NOT_FOUND",
            LedgerError::InsufficientFunds(_) => "INSUFFICIENT_FUNDS",
            LedgerError::CreationExhausted { .. } => "CREATION_EXHAUSTED",
            LedgerError::Conflict(_) => "CONFLICT",
        }
    }

    /// Get HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            LedgerError::Validation(_) => 400,
            LedgerError::AccountNotFound(_) | LedgerError::ClientNotFound(_) => 404,
            LedgerError::CreationExhausted { .. } => 409,
            LedgerError::InsufficientFunds(_) => 422,
            LedgerError::Conflict(_) => 503,
        }
    }
}

impl From<StoreError> for LedgerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::AccountNotFound(id) => LedgerError::AccountNotFound(id),
            StoreError::ClientNotFound(id) => LedgerError::ClientNotFound(id),
            StoreError::InsufficientFunds(id) => LedgerError::InsufficientFunds(id),
            StoreError::BalanceOutOfRange(id) => LedgerError::Validation(format!(
                "balance of account {} would exceed the supported maximum",
                id
            )),
            StoreError::DuplicateAccountNumber => {
                LedgerError::Conflict("account number already exists".to_string())
            }
            StoreError::Backend(msg) => LedgerError::Conflict(msg),
        }
    }
}

impl From<MoneyError> for LedgerError {
    fn from(e: MoneyError) -> Self {
        LedgerError::Validation(e.to_string())
    }
}
