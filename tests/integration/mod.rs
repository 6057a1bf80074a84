//! Integration tests using WireMock
//!
//! These tests drive the blocking client against a mock HTTP server. The
//! server runs on a runtime owned by the test; client calls are made from the
//! test thread, outside that runtime.

pub mod attachments;
pub mod errors;
pub mod retry;
pub mod rows;
pub mod sheets;

use integrations_smartsheet::prelude::*;
use integrations_smartsheet::RetryContext;
use serde_json::Value;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

/// Token the test clients authenticate with.
pub const TEST_TOKEN: &str = "test-access-token";

/// A mock server plus the runtime it lives on.
pub struct TestServer {
    server: MockServer,
    runtime: Runtime,
}

impl TestServer {
    /// Starts a mock server.
    pub fn start() -> Self {
        let runtime = Runtime::new().expect("runtime");
        let server = runtime.block_on(MockServer::start());
        Self { server, runtime }
    }

    /// Mounts a mock.
    pub fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    /// Base URL of the mocked API.
    pub fn api_url(&self) -> String {
        format!("{}/2.0", self.server.uri())
    }

    /// Requests received so far.
    pub fn received_requests(&self) -> Vec<wiremock::Request> {
        self.runtime
            .block_on(self.server.received_requests())
            .unwrap_or_default()
    }

    /// A client builder pointed at the server with millisecond backoff.
    pub fn client_builder(&self) -> SmartsheetClientBuilder {
        SmartsheetClient::builder()
            .access_token(TEST_TOKEN)
            .base_url(self.api_url())
            .retry(fast_retry(5))
    }

    /// A client pointed at the server.
    pub fn client(&self) -> SmartsheetClient {
        self.client_builder().build().expect("Failed to build client")
    }
}

/// Retry settings with millisecond waits.
pub fn fast_retry(max_attempts: u32) -> RetryConfig {
    RetryConfig {
        max_attempts: Some(max_attempts),
        initial_backoff: Duration::from_millis(5),
        max_backoff: Duration::from_millis(20),
        jitter: 0.0,
        ..RetryConfig::default()
    }
}

/// Helper to create an authenticated mock
pub fn mock_with_auth(method_matcher: &str, path_matcher: &str) -> MockBuilder {
    Mock::given(method(method_matcher))
        .and(path(path_matcher))
        .and(header("Authorization", format!("Bearer {}", TEST_TOKEN).as_str()))
}

/// Helper to create error response templates
pub fn error_response(status: u16, error_code: i32, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(serde_json::json!({
        "errorCode": error_code,
        "message": message,
        "refId": "123abc"
    }))
}

/// Helper to create success response templates
pub fn success_response(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

/// Helper to wrap an object in a result envelope
pub fn result_response(result: Value) -> ResponseTemplate {
    success_response(serde_json::json!({
        "message": "SUCCESS",
        "resultCode": 0,
        "result": result
    }))
}

/// Counts retry waits.
#[derive(Default)]
pub struct CountingHook {
    waits: AtomicU32,
}

impl CountingHook {
    /// Number of waits observed.
    pub fn waits(&self) -> u32 {
        self.waits.load(Ordering::SeqCst)
    }
}

impl RetryHook for CountingHook {
    fn on_retry(&self, _context: &RetryContext) {
        self.waits.fetch_add(1, Ordering::SeqCst);
    }
}

/// Builds a hook shared between the test and the client.
pub fn counting_hook() -> Arc<CountingHook> {
    Arc::new(CountingHook::default())
}
