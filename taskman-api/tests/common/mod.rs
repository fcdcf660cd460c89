#![allow(dead_code)]

/// Common test utilities for integration tests
///
/// Builds the full router on top of the in-memory store and provides helpers
/// for sending requests and carrying session cookies between them.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use taskman_api::app::{build_router, AppState};
use taskman_api::config::Config;
use taskman_shared::store::MemoryStore;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "integration-test-secret-key-32-bytes-min";

/// Test context containing the router and the state behind it
pub struct TestContext {
    pub app: Router,
    pub state: AppState,
}

/// Response captured for assertions
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// All `Set-Cookie` header values
    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect()
    }

    /// The `Set-Cookie` value for one cookie name
    pub fn set_cookie(&self, name: &str) -> Option<String> {
        self.set_cookies()
            .into_iter()
            .find(|c| c.starts_with(&format!("{}=", name)))
    }

    /// `Cookie` request header value replaying every cookie this response set
    pub fn cookie_header(&self) -> String {
        self.set_cookies()
            .iter()
            .filter_map(|c| c.split(';').next())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl TestContext {
    /// Creates a fresh context with an empty in-memory store
    pub fn new() -> Self {
        Self::with_vars(&[])
    }

    /// Creates a context with extra configuration variables
    pub fn with_vars(vars: &[(&str, &str)]) -> Self {
        let config = Config::from_lookup(|key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
                .or_else(|| match key {
                    "JWT_SECRET_KEY" => Some(JWT_SECRET.to_string()),
                    "STORE_BACKEND" => Some("memory".to_string()),
                    _ => None,
                })
        })
        .expect("test configuration should load");

        let store = Arc::new(MemoryStore::new(config.store.operation_timeout));
        let state = AppState::new(config, store.clone(), store).expect("state should build");
        let app = build_router(state.clone());

        Self { app, state }
    }

    /// Sends a request through the router
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        self.send_request(request).await
    }

    /// Sends a prebuilt request through the router
    pub async fn send_request(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> TestResponse {
        self.send(
            Method::POST,
            "/api/Register",
            None,
            Some(json!({ "username": username, "email": email, "password": password })),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.send(
            Method::POST,
            "/api/Login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await
    }

    /// Registers a user and returns the `Cookie` header for its session
    pub async fn session(&self, username: &str, email: &str) -> String {
        let response = self.register(username, email, "secret1").await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.cookie_header()
    }

    /// Creates a task and returns its id
    pub async fn create_task(&self, cookie: &str, title: &str) -> String {
        let response = self
            .send(
                Method::POST,
                "/api/task/create",
                Some(cookie),
                Some(json!({ "title": title, "status": "pending", "priority": "medium" })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        response.body["id"].as_str().unwrap().to_string()
    }

    /// Seals a raw token the way the server does for cookies
    pub fn seal(&self, token: &str) -> String {
        self.state.sealer.seal(token).unwrap()
    }
}
