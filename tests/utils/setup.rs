use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::{sync::Arc, time::Duration};
use tower::ServiceExt;

use auth_service::{create_router, AppState, InMemoryUserRepository, PasswordHasher, TokenConfig};

// Lowest cost bcrypt accepts; keeps the suite fast
const TEST_BCRYPT_COST: u32 = 4;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub app: Router,
    pub repository: Arc<InMemoryUserRepository>,
    pub token_config: TokenConfig,
}

pub struct TestSetupBuilder {
    secret: String,
    expiration: Duration,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            secret: "integration-secret".to_string(),
            expiration: Duration::from_secs(3600),
        }
    }

    pub fn with_secret(mut self, secret: &str) -> Self {
        self.secret = secret.to_string();
        self
    }

    pub fn build(self) -> TestSetup {
        let repository = Arc::new(InMemoryUserRepository::new());
        let token_config = TokenConfig::new(self.secret, self.expiration);
        let state = AppState::new(
            repository.clone(),
            token_config.clone(),
            PasswordHasher::new(TEST_BCRYPT_COST),
        );

        TestSetup {
            app: create_router(state),
            repository,
            token_config,
        }
    }
}

impl TestSetup {
    /// Sends a request through the full router; the body decodes to Null when it is not JSON
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn register(&self, username: &str, password: &str, email: &str) -> (StatusCode, Value) {
        self.post_json(
            "/auth/register",
            json!({ "username": username, "password": password, "email": email }),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.post_json("/auth/login", json!({ "email": email, "password": password }))
            .await
    }

    pub async fn me(&self, authorization: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().uri("/auth/me");
        if let Some(value) = authorization {
            builder = builder.header("Authorization", value);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }
}
