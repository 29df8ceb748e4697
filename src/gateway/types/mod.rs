//! Gateway types module
//!
//! ## Input Types
//! - [`StrictDecimal`]: Format-validated decimal for amounts
//! - request bodies for account and transfer routes
//!
//! ## Output Types
//! - [`ApiResponse<T>`]: Unified API response wrapper
//! - [`ApiError`]: error response with HTTP status
//!
//! ## Submodules
//! - [`money`]: StrictDecimal
//! - [`response`]: Response types and error codes

pub mod money;
pub mod response;

use axum::extract::{Path, rejection::PathRejection};
use serde::Deserialize;

use crate::core_types::{AccountId, ClientId};

// Re-export commonly used types at module root
pub use money::StrictDecimal;
pub use response::{ApiError, ApiResponse, ApiResult, created, error_codes, ok};

/// POST /api/v1/accounts
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub client_id: ClientId,
}

/// POST /api/v1/accounts/{id}/deposit and /withdraw
#[derive(Debug, Deserialize)]
pub struct AmountRequest {
    pub amount: StrictDecimal,
}

/// POST /api/v1/transactions
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub from_account_id: AccountId,
    pub to_account_id: AccountId,
    pub amount: StrictDecimal,
}

/// GET /api/v1/accounts?client_id=
#[derive(Debug, Deserialize)]
pub struct ClientQuery {
    pub client_id: ClientId,
}

/// GET /api/v1/transactions/by-account/{id}?limit=&offset=
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `{id}` / `{account_id}` path segment, rejection kept so it can be enveloped
pub type AccountPath = Result<Path<AccountId>, PathRejection>;

/// Unwrap an [`AccountPath`]; a non-numeric segment is a 400 in the JSON envelope
pub fn path_id(path: AccountPath) -> Result<AccountId, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|e| ApiError::bad_request(format!("Invalid account id: {}", e.body_text())))
}
