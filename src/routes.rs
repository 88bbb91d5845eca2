use axum::{
    http::HeaderName,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::{account, auth, shared::AppState};

pub const API_BASE_PATH: &str = "/api/v1";

/// Builds the `/api/v1` router.
/// Token-protected routes sit behind `auth::jwt_auth`.
pub fn create_router(app_state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/sign-up", post(auth::sign_up))
        .route("/sign-in", post(auth::sign_in));

    let protected_account_routes = Router::new()
        .route("/transfer", post(account::transfer))
        .route(
            "/:id",
            get(account::get_account).delete(account::delete_account),
        )
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth::jwt_auth,
        ));

    let account_routes = Router::new()
        .route("/", get(account::list_accounts))
        .merge(protected_account_routes);

    // Browsers may only read the token header if it is exposed
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static(auth::TOKEN_HEADER)]);

    Router::new()
        .nest(
            API_BASE_PATH,
            Router::new()
                .nest("/auth", auth_routes)
                .nest("/account", account_routes),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}
