use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{debug, instrument, warn};

use crate::shared::{AppError, AppState};

/// Request header carrying the raw signed token
pub const TOKEN_HEADER: &str = "x-jwt-token";

/// JWT authentication middleware. Validates the `x-jwt-token` header and
/// checks that the token's account still exists.
/// Usage: .route_layer(middleware::from_fn_with_state(app_state.clone(), auth::jwt_auth))
///
/// Every failure produces the same `PermissionDenied` response. The request
/// is passed on unchanged when authentication succeeds.
#[instrument(skip(state, req, next))]
pub async fn jwt_auth(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    debug!(uri = %req.uri(), "JWT authentication middleware triggered");

    let token = req
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| {
            warn!("Missing or unreadable token header");
            AppError::PermissionDenied
        })?;

    let claims = state.token_service.validate_token(token).map_err(|e| {
        warn!(error = %e, "JWT authentication failed");
        AppError::PermissionDenied
    })?;

    if let Err(e) = state
        .account_repository
        .get_account_by_id(claims.id)
        .await
    {
        warn!(account_id = claims.id, error = %e, "Token subject did not resolve to an account");
        return Err(AppError::PermissionDenied);
    }

    debug!(account_id = claims.id, "Authentication successful");

    Ok(next.run(req).await)
}
