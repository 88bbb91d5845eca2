use axum::{
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

use bankapi::auth::TOKEN_HEADER;

use super::setup::TestSetup;

// ============================================================================
// Request Helpers
// ============================================================================

#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn token(&self) -> Option<String> {
        self.headers
            .get(TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    }

    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

impl TestSetup {
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(format!("/api/v1{}", path));
        if let Some(token) = token {
            builder = builder.header(TOKEN_HEADER, token);
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn sign_up(&self, email: &str, password: &str, confirm: &str) -> TestResponse {
        self.send(
            Method::POST,
            "/auth/sign-up",
            None,
            Some(json!({
                "first_name": "Grace",
                "last_name": "Hopper",
                "email": email,
                "password": password,
                "confirm_password": confirm,
            })),
        )
        .await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> TestResponse {
        self.send(
            Method::POST,
            "/auth/sign-in",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await
    }

    /// Signs up and signs in, returning the issued token
    pub async fn register(&self, email: &str, password: &str) -> String {
        let signed_up = self.sign_up(email, password, password).await;
        assert_eq!(signed_up.status, StatusCode::CREATED, "{:?}", signed_up.body);

        self.sign_in(email, password)
            .await
            .token()
            .expect("sign in should return a token")
    }
}
