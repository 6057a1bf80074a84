//! HTTP transport layer for the Smartsheet API.
//!
//! The transport is a blocking collaborator: [`HttpTransport::send`] issues one
//! request and hands back an [`HttpResponse`] whose body has not been read yet.
//! The response owns the pooled connection until it is consumed, released or
//! dropped.

mod length;

pub use length::{LengthEnforcingReader, LengthGuard};

use crate::config::SmartsheetConfig;
use crate::errors::{SmartsheetError, SmartsheetResult, TransportError};
use bytes::Bytes;
use reqwest::blocking::{Body, Client};
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use std::io::{self, Cursor, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use url::Url;

/// HTTP transport abstraction for testability.
pub trait HttpTransport: Send + Sync {
    /// Sends an HTTP request and returns the response with an unread body.
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;

    /// Closes the transport. Requests sent afterwards fail.
    fn close(&self) {}
}

/// HTTP request representation. Built once per attempt.
#[derive(Debug)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Request URL.
    pub url: Url,
    /// Request headers.
    pub headers: HeaderMap,
    /// Request body.
    pub body: RequestBody,
    /// Request timeout.
    pub timeout: Option<Duration>,
}

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET method.
    Get,
    /// POST method.
    Post,
    /// PUT method.
    Put,
    /// DELETE method.
    Delete,
}

impl HttpMethod {
    /// Returns the method name as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

/// Request body variants.
pub enum RequestBody {
    /// Empty body.
    Empty,
    /// Fixed-size bytes.
    Bytes(Bytes),
    /// Streaming body with a declared `Content-Length`.
    Sized {
        /// Byte source, read once.
        reader: Box<dyn Read + Send>,
        /// Declared length.
        length: u64,
    },
}

impl RequestBody {
    /// Returns the declared body length, if the body has one.
    pub fn content_length(&self) -> Option<u64> {
        match self {
            RequestBody::Empty => None,
            RequestBody::Bytes(bytes) => Some(bytes.len() as u64),
            RequestBody::Sized { length, .. } => Some(*length),
        }
    }
}

impl std::fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestBody::Empty => write!(f, "Empty"),
            RequestBody::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
            RequestBody::Sized { length, .. } => write!(f, "Sized({} bytes)", length),
        }
    }
}

/// HTTP response representation.
///
/// The body is consumed at most once. Dropping the response releases the
/// underlying connection whether or not the body was read.
pub struct HttpResponse {
    /// Response status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    body: Box<dyn Read + Send>,
}

impl HttpResponse {
    /// Creates a response around an unread body.
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Read + Send + 'static) -> Self {
        Self {
            status,
            headers,
            body: Box::new(body),
        }
    }

    /// Creates a response from an in-memory body.
    pub fn from_bytes(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self::new(status, headers, Cursor::new(body.into()))
    }

    /// Reads the whole body, releasing the connection.
    pub fn into_bytes(mut self) -> Result<Bytes, TransportError> {
        let mut buffer = Vec::new();
        self.body
            .read_to_end(&mut buffer)
            .map_err(read_error)?;
        Ok(Bytes::from(buffer))
    }

    /// Copies the body into `sink` through one reused buffer of
    /// `buffer_size` bytes and returns the number of bytes copied.
    pub fn copy_to<W: Write + ?Sized>(
        mut self,
        sink: &mut W,
        buffer_size: usize,
    ) -> SmartsheetResult<u64> {
        let mut buffer = vec![0u8; buffer_size.max(1)];
        let mut copied = 0u64;

        loop {
            let read = match self.body.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(SmartsheetError::from(read_error(e))),
            };
            sink.write_all(&buffer[..read])?;
            copied += read as u64;
        }

        sink.flush()?;
        Ok(copied)
    }

    /// Releases the connection without reading the body.
    pub fn release(self) {}
}

impl std::fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

fn read_error(err: io::Error) -> TransportError {
    if err.kind() == io::ErrorKind::TimedOut {
        TransportError::Timeout(format!("Failed to read response body: {}", err))
    } else {
        TransportError::Network(format!("Failed to read response body: {}", err))
    }
}

/// Reqwest-based blocking HTTP transport.
///
/// The wrapped client owns a connection pool that is safe to share between
/// threads; no lock is held across a round-trip.
pub struct ReqwestTransport {
    client: Client,
    closed: AtomicBool,
}

impl ReqwestTransport {
    /// Creates a new reqwest transport.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            closed: AtomicBool::new(false),
        }
    }

    /// Creates a transport configured with the client's timeouts, pool and
    /// proxy settings.
    pub fn from_config(config: &SmartsheetConfig) -> Result<Self, TransportError> {
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(config.pool.max_idle_per_host)
            .pool_idle_timeout(config.pool.idle_timeout)
            .user_agent(config.user_agent.clone());

        if let Some(proxy) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy.as_str())
                .map_err(|e| TransportError::Http(format!("Invalid proxy: {}", e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::Http(format!("Failed to create client: {}", e)))?;
        Ok(Self::new(client))
    }
}

impl HttpTransport for ReqwestTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(TransportError::Closed);
        }

        let method: Method = request.method.into();
        let mut req = self.client.request(method, request.url).headers(request.headers);

        if let Some(timeout) = request.timeout {
            req = req.timeout(timeout);
        }

        match request.body {
            RequestBody::Empty => {}
            RequestBody::Bytes(bytes) => {
                req = req.body(Body::from(bytes));
            }
            RequestBody::Sized { reader, length } => {
                req = req.body(Body::sized(reader, length));
            }
        }

        let response = req.send()?;
        let status = response.status();
        let headers = response.headers().clone();

        Ok(HttpResponse::new(status, headers, response))
    }

    fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}
