use serde::{Deserialize, Serialize};

use crate::user::UserModel;

/// JWT claims identifying an authenticated user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthClaims {
    pub id: i64,
    pub username: String,
    pub exp: usize, // Expiration timestamp (standard JWT claim)
    pub iat: usize, // Issued at timestamp (standard JWT claim)
}

/// Request payload for `POST /auth/register`.
/// Fields are optional so that absent values produce our own 400 rather than
/// the extractor's 422.
#[derive(Deserialize, Default)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

/// Request payload for `POST /auth/login`
#[derive(Deserialize, Default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Public view of a stored user; never carries the password hash
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<&UserModel> for UserResponse {
    fn from(user: &UserModel) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Identity carried by a verified token
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TokenUser {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ProfileResponse {
    pub user: TokenUser,
}

impl From<AuthClaims> for ProfileResponse {
    fn from(claims: AuthClaims) -> Self {
        Self {
            user: TokenUser {
                id: claims.id,
                username: claims.username,
            },
        }
    }
}
