//! Ledger data models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core_types::{AccountId, ClientId, TransferId};

/// Client account as stored in `accounts`.
///
/// Instances held outside the store are snapshots; the store row is the
/// only authoritative balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: AccountId,
    pub client_id: ClientId,
    /// Externally visible, unique, fixed-length numeric string
    pub account_number: String,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Completed movement of funds between two accounts.
///
/// Written once at commit time, never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TransferRecord {
    pub id: TransferId,
    pub from_account_id: AccountId,
    pub to_account_id: AccountId,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl TransferRecord {
    /// True if `account_id` is either leg of this transfer
    pub fn involves(&self, account_id: AccountId) -> bool {
        self.from_account_id == account_id || self.to_account_id == account_id
    }
}
