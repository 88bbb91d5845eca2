use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    middleware::TOKEN_HEADER,
    service::AuthService,
    types::{SignInRequest, SignUpRequest},
};
use crate::account::MessageResponse;
use crate::shared::{AppError, AppState};

fn auth_service(state: &AppState) -> AuthService {
    AuthService::new(
        Arc::clone(&state.account_repository),
        state.token_service.clone(),
        Arc::clone(&state.bank_number_generator),
        state.bank_number_attempts,
    )
}

/// HTTP handler for registering an account
///
/// POST /auth/sign-up
#[instrument(name = "sign_up", skip(state, payload))]
pub async fn sign_up(
    State(state): State<AppState>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let Json(request) = payload.map_err(|_| {
        AppError::Validation(
            "first name, last name, email, password and confirm password is required".to_string(),
        )
    })?;

    let account = auth_service(&state).sign_up(request).await?;
    info!(account_id = account.id, "Sign up completed");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Sign up successful!")),
    ))
}

/// HTTP handler for signing in
///
/// POST /auth/sign-in
/// Returns the token in the `x-jwt-token` response header
#[instrument(name = "sign_in", skip(state, payload))]
pub async fn sign_in(
    State(state): State<AppState>,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> Result<(HeaderMap, Json<MessageResponse>), AppError> {
    let Json(request) = payload
        .map_err(|_| AppError::Validation("email and password are required".to_string()))?;

    let token = auth_service(&state).sign_in(request).await?;

    let mut headers = HeaderMap::new();
    let value = HeaderValue::from_str(&token).map_err(|_| AppError::Internal)?;
    headers.insert(TOKEN_HEADER, value);

    Ok((headers, Json(MessageResponse::new("signed in successfully"))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::repository::{AccountRepository, InMemoryAccountRepository};
    use crate::shared::test_utils::{AppStateBuilder, TEST_SECRET};
    use crate::auth::{TokenConfig, TokenService};
    use axum::{body::Body, http::Request, routing::post, Router};
    use tower::ServiceExt; // for `oneshot`

    fn app(repo: Arc<InMemoryAccountRepository>) -> Router {
        let app_state = AppStateBuilder::new()
            .with_account_repository(repo)
            .build();

        Router::new()
            .route("/auth/sign-up", post(sign_up))
            .route("/auth/sign-in", post(sign_in))
            .with_state(app_state)
    }

    fn json_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    const SIGN_UP_BODY: &str = r#"{
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": "ada@example.com",
        "password": "hunter2",
        "confirm_password": "hunter2"
    }"#;

    #[tokio::test]
    async fn test_sign_up_handler() {
        let repo = Arc::new(InMemoryAccountRepository::new());

        let response = app(repo.clone())
            .oneshot(json_request("/auth/sign-up", SIGN_UP_BODY))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Sign up successful!");

        let stored = repo.get_account_by_email("ada@example.com").await.unwrap();
        assert_eq!(stored.first_name, "Ada");
        assert_ne!(stored.password, "hunter2");
    }

    #[tokio::test]
    async fn test_sign_up_handler_missing_fields() {
        let repo = Arc::new(InMemoryAccountRepository::new());

        let response = app(repo.clone())
            .oneshot(json_request("/auth/sign-up", r#"{"email": "a@b.c"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(
            body["error"],
            "first name, last name, email, password and confirm password is required"
        );
        assert_eq!(repo.account_count(), 0);
    }

    #[tokio::test]
    async fn test_sign_up_handler_password_mismatch() {
        let repo = Arc::new(InMemoryAccountRepository::new());
        let body = SIGN_UP_BODY.replace(
            r#""confirm_password": "hunter2""#,
            r#""confirm_password": "hunter3""#,
        );

        let response = app(repo.clone())
            .oneshot(json_request("/auth/sign-up", &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "password and confirm password should match");
        assert_eq!(repo.account_count(), 0);
    }

    #[tokio::test]
    async fn test_sign_in_handler_sets_token_header() {
        let repo = Arc::new(InMemoryAccountRepository::new());
        let app = app(repo.clone());

        app.clone()
            .oneshot(json_request("/auth/sign-up", SIGN_UP_BODY))
            .await
            .unwrap();

        let response = app
            .oneshot(json_request(
                "/auth/sign-in",
                r#"{"email": "ada@example.com", "password": "hunter2"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let token = response
            .headers()
            .get(TOKEN_HEADER)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();

        let claims = TokenService::new(TokenConfig::new(TEST_SECRET))
            .validate_token(&token)
            .unwrap();
        let stored = repo.get_account_by_email("ada@example.com").await.unwrap();
        assert_eq!(claims.id, stored.id);

        let body = body_json(response).await;
        assert_eq!(body["message"], "signed in successfully");
    }

    #[tokio::test]
    async fn test_sign_in_handler_bad_credentials() {
        let repo = Arc::new(InMemoryAccountRepository::new());
        let app = app(repo);

        app.clone()
            .oneshot(json_request("/auth/sign-up", SIGN_UP_BODY))
            .await
            .unwrap();

        let response = app
            .oneshot(json_request(
                "/auth/sign-in",
                r#"{"email": "ada@example.com", "password": "nope"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get(TOKEN_HEADER).is_none());
        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid Credentials!");
    }
}
