//! Transfer handlers

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
    AccountPath, ApiError, ApiResult, PageQuery, TransferRequest, created, ok, path_id,
};
use crate::ledger::TransferRecord;
use crate::transfer::DEFAULT_PAGE_LIMIT;

/// Move funds between two accounts
///
/// POST /api/v1/transactions
/// {"from_account_id": 1, "to_account_id": 2, "amount": "25.00"}
pub async fn create_transfer(
    State(state): State<Arc<AppState>>,
    body: Result<Json<TransferRequest>, JsonRejection>,
) -> ApiResult<TransferRecord> {
    let Json(req) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let record = state
        .transfers
        .transfer(req.from_account_id, req.to_account_id, req.amount.inner())
        .await?;
    created(record)
}

/// GET /api/v1/transactions/by-account/{account_id}?limit=50&offset=0
pub async fn list_transfers(
    State(state): State<Arc<AppState>>,
    path: AccountPath,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Vec<TransferRecord>> {
    let account_id = path_id(path)?;
    let Query(page) = query.map_err(|_| ApiError::bad_request("Invalid limit or offset"))?;
    let records = state
        .transfers
        .list_transfers(
            account_id,
            page.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
            page.offset.unwrap_or(0),
        )
        .await?;
    ok(records)
}
