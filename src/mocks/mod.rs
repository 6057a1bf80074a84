//! Mock implementations for testing.
//!
//! [`MockTransport`] replays a queue of scripted responses and records every
//! request it receives, including the bytes of streamed bodies.

use crate::auth::CredentialStore;
use crate::client::RequestExecutor;
use crate::config::SmartsheetConfig;
use crate::errors::TransportError;
use crate::resilience::RetryConfig;
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, RequestBody};
use bytes::Bytes;
use parking_lot::Mutex;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use std::collections::VecDeque;
use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// A scripted response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// Status code.
    pub status: u16,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body.
    pub body: Bytes,
    /// Reading the body fails with a reset connection.
    pub unreadable: bool,
}

impl MockResponse {
    /// A JSON response.
    pub fn json(status: u16, body: &str) -> Self {
        Self::bytes(status, "application/json", body.as_bytes().to_vec())
    }

    /// A response with an arbitrary content type.
    pub fn bytes(status: u16, content_type: &'static str, body: Vec<u8>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        Self {
            status,
            headers,
            body: Bytes::from(body),
            unreadable: false,
        }
    }

    /// A response whose body cannot be read.
    pub fn unreadable(status: u16) -> Self {
        Self {
            unreadable: true,
            ..Self::bytes(status, "application/json", Vec::new())
        }
    }

    /// Adds a header.
    pub fn with_header(mut self, name: &'static str, value: &'static str) -> Self {
        self.headers.insert(name, HeaderValue::from_static(value));
        self
    }
}

struct ResetBody;

impl Read for ResetBody {
    fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
        Err(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset",
        ))
    }
}

/// A request as seen by the mock.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Full URL.
    pub url: Url,
    /// Headers.
    pub headers: HeaderMap,
    /// Body bytes; streamed bodies are read to the end.
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// Returns a header as a string.
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}

/// Mock HTTP transport for testing.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<MockResponse, TransportError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
    closed: AtomicBool,
}

impl MockTransport {
    /// Creates a new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response.
    pub fn enqueue(&self, response: MockResponse) {
        self.responses.lock().push_back(Ok(response));
    }

    /// Queues a transport failure.
    pub fn enqueue_error(&self, error: TransportError) {
        self.responses.lock().push_back(Err(error));
    }

    /// Returns every recorded request.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Returns the most recent request.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().last().cloned()
    }

    /// Number of requests received.
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Returns true once `close` was called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl HttpTransport for MockTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        if self.is_closed() {
            return Err(TransportError::Closed);
        }

        let body = match request.body {
            RequestBody::Empty => Vec::new(),
            RequestBody::Bytes(bytes) => bytes.to_vec(),
            RequestBody::Sized { mut reader, .. } => {
                let mut buffer = Vec::new();
                reader
                    .read_to_end(&mut buffer)
                    .map_err(|e| TransportError::Http(format!("Failed to read body: {}", e)))?;
                buffer
            }
        };

        self.requests.lock().push(RecordedRequest {
            method: request.method,
            url: request.url,
            headers: request.headers,
            body,
        });

        let scripted = self
            .responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Http("No mock response queued".to_string())))?;

        let status = StatusCode::from_u16(scripted.status)
            .map_err(|e| TransportError::Http(e.to_string()))?;
        if scripted.unreadable {
            return Ok(HttpResponse::new(status, scripted.headers, ResetBody));
        }
        Ok(HttpResponse::from_bytes(status, scripted.headers, scripted.body))
    }

    fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}

/// Builds an executor over `transport` with millisecond backoff.
pub fn executor_for(transport: Arc<MockTransport>) -> Arc<RequestExecutor> {
    let config = SmartsheetConfig::builder()
        .access_token("test-token")
        .base_url("https://api.test/2.0")
        .retry(RetryConfig {
            max_attempts: Some(3),
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(2),
            jitter: 0.0,
            ..RetryConfig::default()
        })
        .build()
        .expect("valid test config");
    let credentials = Arc::new(CredentialStore::new(config.access_token.clone()));
    Arc::new(RequestExecutor::new(&config, transport, credentials))
}
