//! Account management module
//!
//! Account lifecycle (creation with external account numbers, lookup) and
//! single-account balance operations (deposit, withdraw).

pub mod number;
pub mod service;

// Re-export commonly used types
pub use number::{
    ACCOUNT_NUMBER_LENGTH, AccountNumberGenerator, PresetAccountNumbers, RandomAccountNumbers,
};
pub use service::AccountService;
