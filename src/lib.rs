// Library crate for the authentication service
// This file exposes the public API for the binary and integration tests

pub mod auth;
pub mod config;
pub mod routes;
pub mod shared;
pub mod user;

// Re-export commonly used types for easier access in tests
pub use auth::{password::PasswordHasher, token::TokenConfig, AuthClaims};
pub use config::{AppConfig, ConfigError};
pub use routes::create_router;
pub use shared::{AppError, AppState};
pub use user::{InMemoryUserRepository, PostgresUserRepository, UserRepository};
