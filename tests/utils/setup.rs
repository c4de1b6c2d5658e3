use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use playlist_api::{build_router, AppState, InMemoryStore, PasswordHasher, TokenService};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub const TEST_SECRET: &str = "integration-secret";

pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Router over an in-memory store, driven one request at a time
pub struct TestApp {
    pub store: Arc<InMemoryStore>,
    router: Router,
}

pub struct TestAppBuilder {
    seeded: bool,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self { seeded: true }
    }

    pub fn empty(mut self) -> Self {
        self.seeded = false;
        self
    }

    pub fn build(self) -> TestApp {
        let hasher = PasswordHasher::new(PasswordHasher::MIN_COST);
        let store = if self.seeded {
            Arc::new(InMemoryStore::seeded(&hasher).unwrap())
        } else {
            Arc::new(InMemoryStore::new())
        };

        let state = AppState::from_store(
            store.clone(),
            TokenService::new(TEST_SECRET, 24),
            hasher,
        );

        TestApp {
            store,
            router: build_router(state),
        }
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> ApiResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        ApiResponse { status, body }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> ApiResponse {
        self.request("GET", uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> ApiResponse {
        self.request("POST", uri, token, Some(body)).await
    }

    /// Registers a user and returns (user id, token)
    pub async fn register(&self, username: &str, password: &str) -> (i64, String) {
        let response = self
            .post(
                "/users/register",
                None,
                serde_json::json!({ "username": username, "password": password }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        (
            response.body["user"]["id"].as_i64().unwrap(),
            response.body["token"].as_str().unwrap().to_string(),
        )
    }

    /// Logs in and returns the token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .post(
                "/users/login",
                None,
                serde_json::json!({ "username": username, "password": password }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.body["token"].as_str().unwrap().to_string()
    }
}
