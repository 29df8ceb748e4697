//! HTTP handlers
//!
//! Handlers only translate between HTTP and the services; every ledger rule
//! lives in [`crate::account`] and [`crate::transfer`].

pub mod account;
pub mod health;
pub mod transfer;

pub use account::{create_account, deposit, get_account, list_accounts, withdraw};
pub use health::{health_check, route_not_found};
pub use transfer::{create_transfer, list_transfers};
