use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::time::Duration;
use tracing::{debug, instrument};

use super::types::AuthClaims;
use crate::shared::AppError;

/// Configuration for JWT token operations.
///
/// Holds the server-wide signing secret and token lifetime. Built once at
/// startup and shared read-only by the login handler and `jwt_auth`.
#[derive(Clone)]
pub struct TokenConfig {
    secret: String,
    pub expiration: Duration,
}

impl TokenConfig {
    pub fn new(secret: String, expiration: Duration) -> Self {
        Self { secret, expiration }
    }

    /// Creates a new JWT token for the given user, issued now
    #[instrument(skip(self, username))]
    pub fn create_token(&self, id: i64, username: &str) -> Result<String, AppError> {
        self.create_token_at(id, username, Utc::now())
    }

    /// Creates a JWT token as if issued at `issued_at`.
    /// The result depends only on the identity, the secret and the lifetime.
    #[instrument(skip(self, username))]
    pub fn create_token_at(
        &self,
        id: i64,
        username: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let lifetime = chrono::Duration::from_std(self.expiration)
            .map_err(|e| AppError::TokenError(e.to_string()))?;
        let exp = issued_at
            .checked_add_signed(lifetime)
            .ok_or_else(|| {
                AppError::TokenError("token expiry is out of the representable range".to_string())
            })?
            .timestamp() as usize;

        debug!(
            expiration_secs = self.expiration.as_secs(),
            exp_timestamp = exp,
            "Creating JWT token with expiration"
        );

        let claims = AuthClaims {
            id,
            username: username.to_string(),
            exp,
            iat: issued_at.timestamp() as usize,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
        .map_err(|e| {
            debug!(error = %e, "Failed to encode JWT token");
            AppError::TokenError(e.to_string())
        })
    }

    /// Validates a JWT token and returns the claims if valid.
    /// Expiry is checked without leeway.
    #[instrument(skip(self, token))]
    pub fn validate_token(&self, token: &str) -> Result<AuthClaims, AppError> {
        debug!("Decoding and validating JWT token");

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<AuthClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &validation,
        )
        .map(|data| {
            debug!(
                user_id = data.claims.id,
                username = %data.claims.username,
                exp = data.claims.exp,
                "JWT token decoded successfully"
            );
            data.claims
        })
        .map_err(|e| {
            debug!(error = %e, "Failed to decode JWT token");
            AppError::InvalidToken
        })
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("expiration", &self.expiration)
            .finish()
    }
}
