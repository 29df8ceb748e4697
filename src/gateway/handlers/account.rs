//! Account handlers (lifecycle, lookup, deposit, withdraw)

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};

use super::super::state::AppState;
use super::super::types::{
    AccountPath, AmountRequest, ApiError, ApiResult, ClientQuery, CreateAccountRequest, created,
    ok, path_id,
};
use crate::ledger::Account;

/// Open an account
///
/// POST /api/v1/accounts  {"client_id": 7}
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> ApiResult<Account> {
    let Json(req) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let account = state.accounts.create_account(req.client_id).await?;
    created(account)
}

/// GET /api/v1/accounts/{id}
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    path: AccountPath,
) -> ApiResult<Account> {
    let id = path_id(path)?;
    ok(state.accounts.get_account(id).await?)
}

/// GET /api/v1/accounts?client_id=7
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ClientQuery>, QueryRejection>,
) -> ApiResult<Vec<Account>> {
    let Query(q) = query.map_err(|_| ApiError::bad_request("Missing or invalid client_id"))?;
    ok(state.accounts.list_accounts_by_client(q.client_id).await?)
}

/// POST /api/v1/accounts/{id}/deposit  {"amount": "10.00"}
pub async fn deposit(
    State(state): State<Arc<AppState>>,
    path: AccountPath,
    body: Result<Json<AmountRequest>, JsonRejection>,
) -> ApiResult<Account> {
    let id = path_id(path)?;
    let Json(req) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    ok(state.accounts.deposit(id, req.amount.inner()).await?)
}

/// POST /api/v1/accounts/{id}/withdraw  {"amount": "10.00"}
pub async fn withdraw(
    State(state): State<Arc<AppState>>,
    path: AccountPath,
    body: Result<Json<AmountRequest>, JsonRejection>,
) -> ApiResult<Account> {
    let id = path_id(path)?;
    let Json(req) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    ok(state.accounts.withdraw(id, req.amount.inner()).await?)
}
