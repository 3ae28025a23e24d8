use tracing::{debug, error, instrument, warn};

use crate::shared::AppError;

/// Work factor used when none is configured
pub const DEFAULT_COST: u32 = 10;
/// Range of work factors bcrypt accepts
pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

/// bcrypt wrapper. Hashing is CPU-bound, so both operations run on the
/// blocking thread pool instead of the async workers.
#[derive(Clone, Copy, Debug)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Produces a salted bcrypt hash of `password`
    #[instrument(skip(self, password), fields(cost = self.cost))]
    pub async fn hash(&self, password: String) -> Result<String, AppError> {
        let cost = self.cost;
        let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| {
                error!(error = %e, "Password hashing task failed");
                AppError::Internal
            })?
            .map_err(|e| {
                warn!(error = %e, "Failed to hash password");
                AppError::HashingError(e.to_string())
            })?;

        debug!("Password hashed");
        Ok(hashed)
    }

    /// Checks `password` against a stored bcrypt hash.
    /// A hash that cannot be parsed is an error, not a mismatch.
    #[instrument(skip(self, password, hash))]
    pub async fn verify(&self, password: String, hash: String) -> Result<bool, AppError> {
        let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| {
                error!(error = %e, "Password verification task failed");
                AppError::Internal
            })?
            .map_err(|e| {
                warn!(error = %e, "Stored password hash could not be verified");
                AppError::HashingError(e.to_string())
            })?;

        debug!(matches, "Password verified");
        Ok(matches)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}
