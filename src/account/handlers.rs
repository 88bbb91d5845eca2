use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    service::AccountService,
    types::{AccountResponse, MessageResponse, TransferRequest},
};
use crate::shared::{AppError, AppState};

fn parse_account_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .map_err(|_| AppError::Validation("provide a numeric value for id".to_string()))
}

/// HTTP handler for listing all accounts
///
/// GET /account
#[instrument(name = "list_accounts", skip(state))]
pub async fn list_accounts(
    State(state): State<AppState>,
) -> Result<Json<Vec<AccountResponse>>, AppError> {
    let service = AccountService::new(Arc::clone(&state.account_repository));
    let accounts = service.list_accounts().await?;

    Ok(Json(accounts))
}

/// HTTP handler for fetching a single account
///
/// GET /account/{id}
#[instrument(name = "get_account", skip(state))]
pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AccountResponse>, AppError> {
    let id = parse_account_id(&id)?;

    let service = AccountService::new(Arc::clone(&state.account_repository));
    let account = service.get_account(id).await?;

    Ok(Json(account))
}

/// HTTP handler for deleting an account
///
/// DELETE /account/{id}
#[instrument(name = "delete_account", skip(state))]
pub async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_account_id(&id)?;

    let service = AccountService::new(Arc::clone(&state.account_repository));
    service.delete_account(id).await?;

    info!(account_id = id, "Account deleted via API");
    Ok(Json(MessageResponse::new("account deleted")))
}

/// HTTP handler for the transfer stub
///
/// POST /account/transfer
/// Echoes the validated payload back
#[instrument(name = "transfer", skip(state, payload))]
pub async fn transfer(
    State(state): State<AppState>,
    payload: Result<Json<TransferRequest>, JsonRejection>,
) -> Result<Json<TransferRequest>, AppError> {
    let Json(request) = payload
        .map_err(|_| AppError::Validation("to_account and amount are required".to_string()))?;

    let service = AccountService::new(Arc::clone(&state.account_repository));
    let echoed = service.transfer(request).await?;

    Ok(Json(echoed))
}
