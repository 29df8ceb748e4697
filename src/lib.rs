//! Funds Ledger - transactional account balances and transfers
//!
//! Balances live in a relational store and move only through atomic,
//! constraint-checked updates. A best-effort cache fronts account reads.
//!
//! # Modules
//!
//! - [`core_types`] - ID type aliases
//! - [`money`] - amount validation
//! - [`ledger`] - ledger store traits and the PostgreSQL / in-memory backends
//! - [`clients`] - client existence lookup
//! - [`cache`] - cache backends and the read-through / invalidate layer
//! - [`account`] - account lifecycle, deposit and withdraw
//! - [`transfer`] - atomic transfers and the compliance hook
//! - [`gateway`] - HTTP API
//! - [`bootstrap`] - wiring of stores, cache and services from configuration

// Core types - must be first!
pub mod core_types;

pub mod account;
pub mod bootstrap;
pub mod cache;
pub mod clients;
pub mod config;
pub mod db;
pub mod deadline;
pub mod error;
pub mod gateway;
pub mod ledger;
pub mod logging;
pub mod money;
pub mod transfer;

// Convenient re-exports at crate root
pub use account::AccountService;
pub use cache::{Cache, CacheLayer, CacheTtls, RedisCache, TtlCache};
pub use clients::{ClientDirectory, PgClientDirectory};
pub use core_types::{AccountId, ClientId, TransferId};
pub use error::LedgerError;
pub use ledger::{
    Account, LedgerStore, LedgerTx, MemoryLedgerStore, PgLedgerStore, StoreError, TransferRecord,
};
pub use transfer::{ComplianceHook, TransferService};
