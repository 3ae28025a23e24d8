use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, instrument, warn};

use super::models::{NewUser, UserModel};
use crate::shared::AppError;

pub const DUPLICATE_EMAIL_MESSAGE: &str = "User already exists";

/// Trait for user repository operations
#[async_trait]
pub trait UserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError>;

    /// Inserts the user and returns the stored row.
    /// Fails with `AppError::Conflict` when the email is already taken.
    async fn create_user(&self, user: &NewUser) -> Result<UserModel, AppError>;
}

struct InMemoryUsers {
    by_email: HashMap<String, UserModel>,
    next_id: i64,
}

/// In-memory implementation of UserRepository for development and testing
///
/// Data is stored in memory and will be lost when the application restarts.
/// The email uniqueness check and the insert happen under the same lock.
pub struct InMemoryUserRepository {
    users: Mutex<InMemoryUsers>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            users: Mutex::new(InMemoryUsers {
                by_email: HashMap::new(),
                next_id: 1,
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, InMemoryUsers>, AppError> {
        self.users
            .lock()
            .map_err(|_| AppError::DatabaseError("user store lock poisoned".to_string()))
    }

    /// Returns the current number of users in the repository
    pub fn user_count(&self) -> usize {
        self.lock().map(|users| users.by_email.len()).unwrap_or(0)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError> {
        debug!("Fetching user from memory");

        let users = self.lock()?;
        let user = users.by_email.get(email).cloned();

        match &user {
            Some(u) => debug!(user_id = u.id, "User found in memory"),
            None => debug!("User not found in memory"),
        }

        Ok(user)
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create_user(&self, user: &NewUser) -> Result<UserModel, AppError> {
        debug!(username = %user.username, "Creating user in memory");

        let mut users = self.lock()?;
        if users.by_email.contains_key(&user.email) {
            warn!("User with this email already exists in memory");
            return Err(AppError::Conflict(DUPLICATE_EMAIL_MESSAGE.to_string()));
        }

        let id = users.next_id;
        users.next_id += 1;
        let model = user.clone().into_model(id);
        users.by_email.insert(model.email.clone(), model.clone());

        debug!(user_id = id, "User created successfully in memory");
        Ok(model)
    }
}

/// PostgreSQL implementation of user repository
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError> {
        debug!("Fetching user from database");

        let user = sqlx::query_as::<_, UserModel>(
            "SELECT id, username, email, password AS password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to fetch user from database");
            AppError::DatabaseError(e.to_string())
        })?;

        match &user {
            Some(u) => debug!(user_id = u.id, "User found in database"),
            None => debug!("User not found in database"),
        }

        Ok(user)
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create_user(&self, user: &NewUser) -> Result<UserModel, AppError> {
        debug!(username = %user.username, "Creating user in database");

        let created = sqlx::query_as::<_, UserModel>(
            "INSERT INTO users (username, email, password) VALUES ($1, $2, $3) \
             RETURNING id, username, email, password AS password_hash, created_at",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                warn!("User with this email already exists in database");
                AppError::Conflict(DUPLICATE_EMAIL_MESSAGE.to_string())
            }
            other => {
                warn!(error = %other, "Failed to create user in database");
                AppError::DatabaseError(other.to_string())
            }
        })?;

        debug!(user_id = created.id, "User created successfully in database");
        Ok(created)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Arc;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser::new(
            username.to_string(),
            email.to_string(),
            "$2b$04$not-a-real-hash".to_string(),
        )
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let repo = InMemoryUserRepository::new();

        let created = repo.create_user(&new_user("alice", "a@x.com")).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.username, "alice");

        let found = repo.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.username, "alice");
        assert_eq!(found.password_hash, "$2b$04$not-a-real-hash");
    }

    #[tokio::test]
    async fn test_find_nonexistent_user() {
        let repo = InMemoryUserRepository::new();

        let result = repo.find_by_email("nobody@x.com").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_ids_are_assigned_sequentially() {
        let repo = InMemoryUserRepository::new();

        let first = repo.create_user(&new_user("alice", "a@x.com")).await.unwrap();
        let second = repo.create_user(&new_user("alice", "b@x.com")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(repo.user_count(), 2);
    }

    #[tokio::test]
    async fn test_create_duplicate_email() {
        let repo = InMemoryUserRepository::new();
        repo.create_user(&new_user("alice", "a@x.com")).await.unwrap();

        let result = repo.create_user(&new_user("mallory", "a@x.com")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(repo.user_count(), 1);

        // First record is untouched
        let stored = repo.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(stored.username, "alice");
    }

    #[tokio::test]
    async fn test_concurrent_inserts_with_same_email_store_one_user() {
        let repo = Arc::new(InMemoryUserRepository::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move {
                    repo.create_user(&new_user(&format!("user-{i}"), "race@x.com"))
                        .await
                })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(AppError::Conflict(_)) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(repo.user_count(), 1);
    }
}
