//! Core types used throughout the ledger
//!
//! Identifiers are assigned by the ledger store (PostgreSQL `BIGSERIAL`),
//! so they are signed to match the column type without conversion.

/// Account ID - primary key of `accounts`, assigned by the store.
///
/// # Constraints:
/// - **Immutable**: Once assigned, NEVER changes
/// - **Positive**: Zero and negative values are rejected before any I/O
/// - **Totally ordered**: Used as the canonical lock order for transfers
pub type AccountId = i64;

/// Client ID - owner of one or more accounts.
pub type ClientId = i64;

/// Transfer ID - store-assigned, opaque, unique across the ledger.
pub type TransferId = String;
