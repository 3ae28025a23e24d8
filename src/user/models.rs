use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the users table
#[derive(Clone, FromRow)]
pub struct UserModel {
    pub id: i64, // Assigned by the store on insert
    pub username: String,
    pub email: String, // Login key, unique per store constraint
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for UserModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserModel")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Fields supplied by the caller when creating a user; the id is left to the store
#[derive(Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl NewUser {
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            username,
            email,
            password_hash,
        }
    }

    /// Materializes the row a store would persist under `id`
    pub fn into_model(self, id: i64) -> UserModel {
        UserModel {
            id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            created_at: Utc::now(),
        }
    }
}
