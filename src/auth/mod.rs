// Public API - what other modules can use
pub use handlers::{login, me, register};
pub use middleware::jwt_auth;
pub use types::AuthClaims;

// Internal modules
mod extract;
mod handlers;
mod middleware;
pub mod password;
pub mod service;
pub mod token;
pub mod types;
