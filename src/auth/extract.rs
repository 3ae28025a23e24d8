use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use tracing::warn;

use super::{
    service::{LOGIN_FIELDS_REQUIRED, REGISTER_FIELDS_REQUIRED},
    types::{LoginRequest, RegisterRequest},
};
use crate::shared::AppError;

/// Request bodies that report a rejected payload with their own message
pub trait RequiredFields {
    const REQUIRED_MESSAGE: &'static str;
}

impl RequiredFields for RegisterRequest {
    const REQUIRED_MESSAGE: &'static str = REGISTER_FIELDS_REQUIRED;
}

impl RequiredFields for LoginRequest {
    const REQUIRED_MESSAGE: &'static str = LOGIN_FIELDS_REQUIRED;
}

/// `Json` extractor whose rejections (bad content type, malformed JSON,
/// mistyped fields) become `AppError::Validation` instead of axum's
/// plain-text 415/422 responses.
pub struct AuthJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for AuthJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + RequiredFields,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                warn!(
                    status = %rejection.status(),
                    error = %rejection.body_text(),
                    "Rejected request body"
                );
                Err(AppError::Validation(T::REQUIRED_MESSAGE.to_string()))
            }
        }
    }
}
