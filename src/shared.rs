use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

use crate::auth::{password::PasswordHasher, token::TokenConfig};
use crate::config::AppConfig;
use crate::user::repository::UserRepository;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub user_repository: Arc<dyn UserRepository + Send + Sync>,
    pub token_config: TokenConfig,
    pub password_hasher: PasswordHasher,
}

impl AppState {
    pub fn new(
        user_repository: Arc<dyn UserRepository + Send + Sync>,
        token_config: TokenConfig,
        password_hasher: PasswordHasher,
    ) -> Self {
        Self {
            user_repository,
            token_config,
            password_hasher,
        }
    }

    /// Wires the state from startup configuration and a chosen store
    pub fn from_config(
        config: &AppConfig,
        user_repository: Arc<dyn UserRepository + Send + Sync>,
    ) -> Self {
        Self::new(
            user_repository,
            TokenConfig::new(config.jwt_secret.clone(), config.token_expiration),
            PasswordHasher::new(config.bcrypt_cost),
        )
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid bearer token")]
    InvalidToken,

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Password hashing error: {0}")]
    HashingError(String),

    #[error("Token signing error: {0}")]
    TokenError(String),

    #[error("Internal server error")]
    Internal,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Conflict(_) | AppError::InvalidCredentials => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MissingToken => StatusCode::UNAUTHORIZED,
            AppError::InvalidToken => StatusCode::FORBIDDEN,
            AppError::DatabaseError(_)
            | AppError::HashingError(_)
            | AppError::TokenError(_)
            | AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::Validation(msg) | AppError::Conflict(msg) | AppError::NotFound(msg) => msg,
            AppError::InvalidCredentials => "invalid credentials".to_string(),
            AppError::MissingToken => "Access denied, no token provided".to_string(),
            AppError::InvalidToken => "Invalid token".to_string(),
            internal => {
                // The cause stays in the server log only
                error!(error = %internal, "Request failed with an internal error");
                "Internal server error".to_string()
            }
        };

        let body = Json(json!({
            "message": message
        }));

        (status, body).into_response()
    }
}
