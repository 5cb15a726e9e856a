//! Test harness for pipeline and HTTP integration tests.
//!
//! Every harness owns a fresh in-memory store and mock infrastructure, so
//! tests never share state and need no external services.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use test_context::AsyncTestContext;
use tower::ServiceExt;

use saver_core::domains::links::models::Link;
use saver_core::kernel::{BaseLinkStore, MockAI, ServerDeps, TestDependencies};
use saver_core::server::{build_app, AxumAppState};

pub const TEST_VERIFY_TOKEN: &str = "test_verify_token";

const SETTLE_TIMEOUT: Duration = Duration::from_secs(2);

/// Canned provider reply used unless a test supplies its own.
pub fn default_ai_reply() -> Value {
    serde_json::json!({
        "title": "Ownership in Rust",
        "summary": "A walkthrough of borrowing and lifetimes.",
        "category": "Coding",
        "tags": ["rust", "ownership", "lifetimes"]
    })
}

/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let (status, body) = ctx.get_json("/links").await;
/// }
/// ```
pub struct TestHarness {
    pub deps: TestDependencies,
    pub server_deps: Arc<ServerDeps>,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new()
    }
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_deps(
            TestDependencies::new().mock_ai(MockAI::new("mock").with_json_response(&default_ai_reply())),
        )
    }

    pub fn with_deps(deps: TestDependencies) -> Self {
        // RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let server_deps = deps.server_deps();
        Self { deps, server_deps }
    }

    pub fn app(&self) -> Router {
        build_app(AxumAppState::new(self.server_deps.clone(), TEST_VERIFY_TOKEN))
    }

    pub async fn request(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self
            .app()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        self.request(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let (status, body) = self.get(uri).await;
        (status, parse_json(&body))
    }

    pub async fn delete_json(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let (status, body) = self.request(request).await;
        (status, parse_json(&body))
    }

    pub async fn post_json(&self, uri: &str, payload: Value) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap();
        let (status, body) = self.request(request).await;
        (status, parse_json(&body))
    }

    pub async fn post_form(&self, uri: &str, fields: &[(&str, &str)]) -> (StatusCode, String) {
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(encoded))
            .unwrap();
        self.request(request).await
    }

    /// Everything in the store, newest first.
    pub async fn links(&self) -> Vec<Link> {
        self.deps.store.list(500, 0, None).await.unwrap()
    }

    /// Wait until every stored link has either been processed or marked
    /// failed. Runs spawned from HTTP handlers are not awaitable directly.
    pub async fn settle(&self) {
        let deadline = tokio::time::Instant::now() + SETTLE_TIMEOUT;
        loop {
            let pending = self
                .links()
                .await
                .iter()
                .any(|l| !l.processed && l.processing_error.is_none());
            if !pending {
                return;
            }
            assert!(
                tokio::time::Instant::now() < deadline,
                "pipeline runs did not settle"
            );
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_json(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or(Value::Null)
}
