use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::shared::AppState;

/// Builds the application router. Routes registered under `protected` sit
/// behind `jwt_auth`.
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/auth/me", get(auth::me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::jwt_auth,
        ));

    Router::new()
        .route("/", get(|| async { "OK" }))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
