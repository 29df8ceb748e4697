//! Cache key scheme
//!
//! The key formats are a stable contract shared with any other reader of
//! the cache. Changing them orphans live entries until their TTL runs out.

use std::time::Duration;

use crate::core_types::{AccountId, ClientId};

/// Single-account projections
pub const ACCOUNT_TTL: Duration = Duration::from_secs(5 * 60);

/// Per-client account lists
pub const ACCOUNT_LIST_TTL: Duration = Duration::from_secs(60);

/// `account:{id}`
pub fn account(id: AccountId) -> String {
    format!("account:{}", id)
}

/// `accounts:client:{id}`
pub fn accounts_by_client(client_id: ClientId) -> String {
    format!("accounts:client:{}", client_id)
}
