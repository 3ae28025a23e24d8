use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    password::PasswordHasher,
    token::TokenConfig,
    types::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UserResponse},
};
use crate::shared::AppError;
use crate::user::{repository::DUPLICATE_EMAIL_MESSAGE, NewUser, UserRepository};

pub const REGISTER_FIELDS_REQUIRED: &str = "Username, password and email are required";
pub const LOGIN_FIELDS_REQUIRED: &str = "Email and password are required";
pub const USER_CREATED: &str = "User created successfully";
pub const USER_NOT_FOUND: &str = "User not found";

/// Service for registration and login business logic
pub struct AuthService {
    repository: Arc<dyn UserRepository + Send + Sync>,
    token_config: TokenConfig,
    password_hasher: PasswordHasher,
}

/// Missing, null and empty-string fields all count as absent
fn present(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

impl AuthService {
    pub fn new(
        repository: Arc<dyn UserRepository + Send + Sync>,
        token_config: TokenConfig,
        password_hasher: PasswordHasher,
    ) -> Self {
        Self {
            repository,
            token_config,
            password_hasher,
        }
    }

    /// Registers a new user with a hashed password
    #[instrument(skip(self, request))]
    pub async fn register(&self, request: RegisterRequest) -> Result<RegisterResponse, AppError> {
        let (Some(username), Some(password), Some(email)) = (
            present(request.username),
            present(request.password),
            present(request.email),
        ) else {
            warn!("Registration rejected: missing required fields");
            return Err(AppError::Validation(REGISTER_FIELDS_REQUIRED.to_string()));
        };

        info!(username = %username, email = %email, "Starting user registration");

        // Early exit only; the store enforces uniqueness on insert
        if self.repository.find_by_email(&email).await?.is_some() {
            warn!(email = %email, "Registration rejected: email already registered");
            return Err(AppError::Conflict(DUPLICATE_EMAIL_MESSAGE.to_string()));
        }

        let password_hash = self.password_hasher.hash(password).await?;
        let user = self
            .repository
            .create_user(&NewUser::new(username, email, password_hash))
            .await?;

        info!(user_id = user.id, "User registered successfully");

        Ok(RegisterResponse {
            message: USER_CREATED.to_string(),
            user: UserResponse::from(&user),
        })
    }

    /// Verifies credentials and issues a signed token
    #[instrument(skip(self, request))]
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        let (Some(email), Some(password)) = (present(request.email), present(request.password))
        else {
            warn!("Login rejected: missing required fields");
            return Err(AppError::Validation(LOGIN_FIELDS_REQUIRED.to_string()));
        };

        info!(email = %email, "Starting user login");

        let user = self
            .repository
            .find_by_email(&email)
            .await?
            .ok_or_else(|| {
                warn!(email = %email, "Login rejected: no user with this email");
                AppError::NotFound(USER_NOT_FOUND.to_string())
            })?;

        let matches = self
            .password_hasher
            .verify(password, user.password_hash.clone())
            .await?;
        if !matches {
            warn!(user_id = user.id, "Login rejected: password mismatch");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.token_config.create_token(user.id, &user.username)?;

        info!(user_id = user.id, "User logged in successfully");

        Ok(LoginResponse {
            token,
            user: UserResponse::from(&user),
        })
    }
}
