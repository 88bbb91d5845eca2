use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

use crate::account::generators::BankNumberGenerator;
use crate::account::models::UniqueField;
use crate::account::repository::AccountRepository;
use crate::auth::TokenService;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub account_repository: Arc<dyn AccountRepository + Send + Sync>,
    pub token_service: TokenService,
    pub bank_number_generator: Arc<dyn BankNumberGenerator>,
    pub bank_number_attempts: u32,
}

impl AppState {
    pub fn new(
        account_repository: Arc<dyn AccountRepository + Send + Sync>,
        token_service: TokenService,
        bank_number_generator: Arc<dyn BankNumberGenerator>,
        bank_number_attempts: u32,
    ) -> Self {
        Self {
            account_repository,
            token_service,
            bank_number_generator,
            bank_number_attempts,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("JWT error: {0}")]
    JwtError(String),

    /// Every auth middleware failure maps here so clients cannot tell
    /// a bad signature from an expired token or an unknown account.
    #[error("Permission Denied")]
    PermissionDenied,

    #[error("Invalid Credentials!")]
    InvalidCredentials,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("an account with this {0} already exists")]
    Conflict(UniqueField),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, error_message) = match &self {
            AppError::PermissionDenied => (StatusCode::FORBIDDEN, message),
            AppError::JwtError(msg) => {
                warn!(error = %msg, "Token issuance failed");
                (StatusCode::BAD_REQUEST, "unable to issue token".to_string())
            }
            AppError::DatabaseError(msg) => {
                warn!(error = %msg, "Storage request failed");
                (
                    StatusCode::BAD_REQUEST,
                    "unable to complete request, please try again".to_string(),
                )
            }
            AppError::Internal
            | AppError::InvalidCredentials
            | AppError::Validation(_)
            | AppError::NotFound(_)
            | AppError::Conflict(_) => (StatusCode::BAD_REQUEST, message),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
