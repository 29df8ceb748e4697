//! Funds transfer module
//!
//! # Architecture
//!
//! - [`TransferService`]: atomic two-account transfer with ordered row locks
//! - [`ComplianceHook`]: post-commit check; may delay the response, never undoes it
//!
//! # Safety Invariants
//!
//! 1. **Conservation**: a committed transfer debits and credits the same amount
//! 2. **Non-negative**: no committed balance is ever below zero
//! 3. **All-or-nothing**: the two balance updates and the record commit together
//! 4. **Lock order**: rows are locked in ascending account ID

pub mod hook;
pub mod service;

// Re-exports for convenience
pub use hook::{ComplianceHook, HookError, NoopHook, SimulatedReviewHook, hook_from_config};
pub use service::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, TransferService};
