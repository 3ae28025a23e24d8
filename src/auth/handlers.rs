use axum::{extract::State, http::StatusCode, Extension, Json};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{
    extract::AuthJson,
    service::AuthService,
    types::{
        AuthClaims, LoginRequest, LoginResponse, ProfileResponse, RegisterRequest,
        RegisterResponse,
    },
};
use crate::shared::{AppError, AppState};

fn auth_service(state: &AppState) -> AuthService {
    AuthService::new(
        Arc::clone(&state.user_repository),
        state.token_config.clone(),
        state.password_hasher,
    )
}

/// HTTP handler for registering a new user
///
/// POST /auth/register
/// Returns 201 with the created user (without its password)
#[instrument(name = "register", skip(state, request))]
pub async fn register(
    State(state): State<AppState>,
    AuthJson(request): AuthJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    info!("Handling registration request");

    let response = auth_service(&state).register(request).await?;

    info!(user_id = response.user.id, "Registration completed");

    Ok((StatusCode::CREATED, Json(response)))
}

/// HTTP handler for logging in
///
/// POST /auth/login
/// Returns a signed token valid for the configured lifetime
#[instrument(name = "login", skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    AuthJson(request): AuthJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    info!("Handling login request");

    let response = auth_service(&state).login(request).await?;

    info!(user_id = response.user.id, "Login completed");

    Ok(Json(response))
}

/// GET /auth/me, behind `jwt_auth`
pub async fn me(Extension(claims): Extension<AuthClaims>) -> Json<ProfileResponse> {
    debug!(user_id = claims.id, "Returning authenticated identity");
    Json(ProfileResponse::from(claims))
}
