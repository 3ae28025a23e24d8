use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::{info, instrument, warn};

use crate::shared::{AppError, AppState};

/// Second whitespace-separated segment of an `Authorization` value
/// (`Bearer <token>`). The scheme word itself is not checked.
fn bearer_token(header_value: &str) -> Option<&str> {
    header_value.split_whitespace().nth(1)
}

/// JWT authentication middleware - validates the Authorization Bearer header and adds AuthClaims to the request.
/// Usage: .route_layer(middleware::from_fn_with_state(app_state.clone(), auth::jwt_auth))
/// Handlers can then extract Extension(claims): Extension<AuthClaims>.
#[instrument(skip(state, req, next))]
pub async fn jwt_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    info!(
        "JWT authentication middleware triggered for request {}",
        req.uri()
    );

    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| {
            warn!("No bearer token in Authorization header");
            AppError::MissingToken
        })?;

    let claims = match state.token_config.validate_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            warn!("JWT authentication failed: {}", e);
            return Err(e);
        }
    };

    info!(
        user_id = claims.id,
        username = %claims.username,
        "Authentication successful, adding claims to request"
    );

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
