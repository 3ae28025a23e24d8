pub mod models;
pub mod repository;

pub use models::{NewUser, UserModel};
pub use repository::{InMemoryUserRepository, PostgresUserRepository, UserRepository};
