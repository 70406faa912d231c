//! Test harness wiring the router to in-memory collaborators.
//!
//! Each test gets a fresh store, SMS gateway and CRM mock; nothing is shared
//! between tests.

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use server_core::kernel::{ServerDeps, TestDependencies};
use server_core::server::build_app;
use server_core::Environment;
use tower::ServiceExt;

/// Captured HTTP response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub raw_body: Vec<u8>,
}

impl TestResponse {
    /// Parse the body as JSON (panics on non-JSON bodies)
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.raw_body).expect("response body should be JSON")
    }

    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}

/// Test harness that owns the mocks and the router built on them.
pub struct TestHarness {
    pub deps: TestDependencies,
    pub app: Router,
}

impl TestHarness {
    /// Harness with production-style error bodies
    pub fn new() -> Self {
        Self::with_environment(Environment::Production)
    }

    pub fn with_environment(environment: Environment) -> Self {
        // Initialize tracing subscriber to respect RUST_LOG environment variable.
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let deps = TestDependencies::new();
        let app = build_app(deps.server_deps(), environment);
        Self { deps, app }
    }

    pub fn server_deps(&self) -> ServerDeps {
        self.deps.server_deps()
    }

    /// Send a request with an optional raw body
    pub async fn request(&self, method: Method, path: &str, body: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if body.is_some() {
            builder = builder.header(CONTENT_TYPE, "application/json");
        }
        let request = builder
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .expect("request should build");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router should not fail");

        let status = response.status();
        let headers = response.headers().clone();
        let raw_body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable")
            .to_vec();

        TestResponse {
            status,
            headers,
            raw_body,
        }
    }

    /// POST a JSON value
    pub async fn post_json(&self, path: &str, body: Value) -> TestResponse {
        self.request(Method::POST, path, Some(&body.to_string()))
            .await
    }
}
