//! Error types for the Smartsheet integration.
//!
//! Every fallible operation returns [`SmartsheetError`]. HTTP failures are
//! produced exclusively by [`classify`], which maps the status code to a fixed
//! kind and keeps the raw status and parsed error body inside [`ApiError`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

mod classify;

pub use classify::{classify, parse_retry_after, RETRYABLE_ERROR_CODES};

/// Result type for Smartsheet operations.
pub type SmartsheetResult<T> = Result<T, SmartsheetError>;

/// Flat classification tag for every [`SmartsheetError`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 400 or 405.
    InvalidRequest,
    /// 401 or 403.
    Authorization,
    /// 404.
    NotFound,
    /// 503, including maintenance windows and rate limiting.
    ServiceUnavailable,
    /// Any other non-success status.
    Rest,
    /// A success status with a body that does not match the expected shape.
    Decode,
    /// An upload source produced more or fewer bytes than declared.
    LengthMismatch,
    /// Retryable failures persisted past the retry budget.
    RetryExhausted,
    /// Connectivity failure below the HTTP layer.
    Network,
    /// Invalid client configuration.
    Configuration,
    /// A request body could not be encoded.
    Serialization,
    /// Local I/O failure (output sink, attachment file).
    Io,
}

impl ErrorKind {
    /// Maps an HTTP status code to its error kind.
    ///
    /// The table is fixed by the wire protocol; unmapped statuses fall back to
    /// [`ErrorKind::Rest`].
    pub fn from_status(status: u16) -> Self {
        match status {
            400 | 405 => ErrorKind::InvalidRequest,
            401 | 403 => ErrorKind::Authorization,
            404 => ErrorKind::NotFound,
            503 => ErrorKind::ServiceUnavailable,
            _ => ErrorKind::Rest,
        }
    }

    /// Returns a stable, lowercase name for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidRequest => "invalid_request",
            ErrorKind::Authorization => "authorization",
            ErrorKind::NotFound => "not_found",
            ErrorKind::ServiceUnavailable => "service_unavailable",
            ErrorKind::Rest => "rest_error",
            ErrorKind::Decode => "decode_error",
            ErrorKind::LengthMismatch => "length_mismatch",
            ErrorKind::RetryExhausted => "retry_exhausted",
            ErrorKind::Network => "network",
            ErrorKind::Configuration => "configuration",
            ErrorKind::Serialization => "serialization",
            ErrorKind::Io => "io",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error payload returned by the API: `{errorCode, message, refId?, detail?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Service-specific error code (e.g. 1006 for "not found").
    pub error_code: i32,
    /// Human-readable message.
    pub message: String,
    /// Server-side reference id for support requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_id: Option<String>,
    /// Nested detail object, kept as raw JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

/// An HTTP-level failure as reported by the service.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    /// Raw HTTP status code.
    pub status: u16,
    /// Parsed error body, if the response carried one.
    pub body: Option<ErrorBody>,
    /// Raw response text when the body was not a recognizable error payload.
    pub raw_body: Option<String>,
    /// `Retry-After` hint from the response headers.
    pub retry_after: Option<Duration>,
}

impl ApiError {
    /// Creates an API error from a status code and parsed body.
    pub fn new(status: u16, body: Option<ErrorBody>) -> Self {
        Self {
            status,
            body,
            raw_body: None,
            retry_after: None,
        }
    }

    /// Returns the service error code, if any.
    pub fn error_code(&self) -> Option<i32> {
        self.body.as_ref().map(|b| b.error_code)
    }

    /// Returns the most specific message available.
    pub fn message(&self) -> &str {
        match (&self.body, &self.raw_body) {
            (Some(body), _) => &body.message,
            (None, Some(raw)) if !raw.is_empty() => raw,
            _ => "no error body",
        }
    }

    /// Returns the server reference id, if any.
    pub fn ref_id(&self) -> Option<&str> {
        self.body.as_ref().and_then(|b| b.ref_id.as_deref())
    }

    /// Returns the nested detail object, if any.
    pub fn detail(&self) -> Option<&serde_json::Value> {
        self.body.as_ref().and_then(|b| b.detail.as_ref())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}: {}", self.status, self.message())?;
        if let Some(code) = self.error_code() {
            write!(f, " (errorCode {})", code)?;
        }
        if let Some(ref_id) = self.ref_id() {
            write!(f, " [refId {}]", ref_id)?;
        }
        Ok(())
    }
}

/// Top-level error type for the Smartsheet integration.
#[derive(Debug, Clone, Error)]
pub enum SmartsheetError {
    /// The service rejected the request as malformed (400, 405).
    #[error("Invalid request: {0}")]
    InvalidRequest(ApiError),

    /// The credentials are missing, invalid or lack access (401, 403).
    #[error("Authorization error: {0}")]
    Authorization(ApiError),

    /// The addressed resource does not exist (404).
    #[error("Not found: {0}")]
    NotFound(ApiError),

    /// The service is temporarily unavailable (503).
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(ApiError),

    /// Any other non-success status.
    #[error("API error: {0}")]
    Rest(ApiError),

    /// The response status was successful but the body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// An upload stream disagreed with its declared length.
    #[error("Length mismatch: {0}")]
    LengthMismatch(#[from] LengthMismatch),

    /// Retryable failures continued until the retry budget ran out.
    #[error("Retry budget exhausted after {attempts} attempts in {elapsed:?}: {last}")]
    RetryExhausted {
        /// Total attempts made, including the first.
        attempts: u32,
        /// Wall-clock time spent across all attempts.
        elapsed: Duration,
        /// The last retryable error observed.
        #[source]
        last: Box<SmartsheetError>,
    },

    /// Network error.
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A request body could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Local I/O error.
    #[error("I/O error: {0}")]
    Io(String),
}

impl SmartsheetError {
    /// Creates the typed error for an HTTP failure of the given kind.
    ///
    /// Kinds without an HTTP meaning fall back to [`SmartsheetError::Rest`].
    pub fn from_api(kind: ErrorKind, api: ApiError) -> Self {
        match kind {
            ErrorKind::InvalidRequest => SmartsheetError::InvalidRequest(api),
            ErrorKind::Authorization => SmartsheetError::Authorization(api),
            ErrorKind::NotFound => SmartsheetError::NotFound(api),
            ErrorKind::ServiceUnavailable => SmartsheetError::ServiceUnavailable(api),
            _ => SmartsheetError::Rest(api),
        }
    }

    /// Creates a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        SmartsheetError::Configuration(ConfigurationError::InvalidConfiguration(msg.into()))
    }

    /// Creates a network error.
    pub fn network(msg: impl Into<String>) -> Self {
        SmartsheetError::Network(NetworkError::ConnectionFailed(msg.into()))
    }

    /// Creates a timeout error.
    pub fn timeout(msg: impl Into<String>) -> Self {
        SmartsheetError::Network(NetworkError::Timeout(msg.into()))
    }

    /// Creates a decode error.
    pub fn decode(status: u16, msg: impl Into<String>) -> Self {
        SmartsheetError::Decode(DecodeError {
            status,
            message: msg.into(),
        })
    }

    /// Creates a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        SmartsheetError::Serialization(msg.into())
    }

    /// Creates an I/O error.
    pub fn io(msg: impl Into<String>) -> Self {
        SmartsheetError::Io(msg.into())
    }

    /// Returns the classification tag of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SmartsheetError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            SmartsheetError::Authorization(_) => ErrorKind::Authorization,
            SmartsheetError::NotFound(_) => ErrorKind::NotFound,
            SmartsheetError::ServiceUnavailable(_) => ErrorKind::ServiceUnavailable,
            SmartsheetError::Rest(_) => ErrorKind::Rest,
            SmartsheetError::Decode(_) => ErrorKind::Decode,
            SmartsheetError::LengthMismatch(_) => ErrorKind::LengthMismatch,
            SmartsheetError::RetryExhausted { .. } => ErrorKind::RetryExhausted,
            SmartsheetError::Network(_) => ErrorKind::Network,
            SmartsheetError::Configuration(_) => ErrorKind::Configuration,
            SmartsheetError::Serialization(_) => ErrorKind::Serialization,
            SmartsheetError::Io(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn api_error_mut(&mut self) -> Option<&mut ApiError> {
        match self {
            SmartsheetError::InvalidRequest(api)
            | SmartsheetError::Authorization(api)
            | SmartsheetError::NotFound(api)
            | SmartsheetError::ServiceUnavailable(api)
            | SmartsheetError::Rest(api) => Some(api),
            _ => None,
        }
    }

    /// Returns the API error for HTTP-level failures.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            SmartsheetError::InvalidRequest(api)
            | SmartsheetError::Authorization(api)
            | SmartsheetError::NotFound(api)
            | SmartsheetError::ServiceUnavailable(api)
            | SmartsheetError::Rest(api) => Some(api),
            SmartsheetError::RetryExhausted { last, .. } => last.api_error(),
            _ => None,
        }
    }

    /// Returns the HTTP status code if applicable.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            SmartsheetError::Decode(decode) => Some(decode.status),
            other => other.api_error().map(|api| api.status),
        }
    }

    /// Returns the service error code if the response carried one.
    pub fn error_code(&self) -> Option<i32> {
        self.api_error().and_then(ApiError::error_code)
    }

    /// Returns true if the error is transient and the call may be re-issued.
    ///
    /// Invalid-request, authorization and not-found failures are deterministic
    /// and never retryable, whatever error code they carry.
    pub fn is_retryable(&self) -> bool {
        match self {
            SmartsheetError::ServiceUnavailable(_) => true,
            SmartsheetError::Rest(api) => api
                .error_code()
                .map_or(false, |code| RETRYABLE_ERROR_CODES.contains(&code)),
            SmartsheetError::Network(NetworkError::ConnectionFailed(_))
            | SmartsheetError::Network(NetworkError::Timeout(_)) => true,
            _ => false,
        }
    }

    /// Returns the retry delay hint if available.
    pub fn retry_after(&self) -> Option<Duration> {
        self.api_error().and_then(|api| api.retry_after)
    }
}

/// A success response whose body did not decode into the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to decode HTTP {status} response: {message}")]
pub struct DecodeError {
    /// Status of the response that carried the body.
    pub status: u16,
    /// Decoder message.
    pub message: String,
}

/// An upload source that produced a different number of bytes than declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("declared content length {expected}, stream produced {actual} bytes")]
pub struct LengthMismatch {
    /// Declared length.
    pub expected: u64,
    /// Bytes observed when the mismatch was detected.
    pub actual: u64,
}

/// Configuration errors.
#[derive(Debug, Clone, Error)]
pub enum ConfigurationError {
    /// No access token was supplied and none was found in the environment.
    #[error("Missing access token: {0}")]
    MissingAccessToken(String),

    /// Invalid base URL.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// A value could not be used as an HTTP header.
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Network errors.
#[derive(Debug, Clone, Error)]
pub enum NetworkError {
    /// Connection failed (DNS, refused, reset).
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Timeout.
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// The request failed below the HTTP layer for a non-transient reason.
    #[error("Request failed: {0}")]
    Request(String),

    /// The transport was closed.
    #[error("Transport closed")]
    Closed,
}

/// Transport errors.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Network error.
    #[error("Network error: {0}")]
    Network(String),

    /// Timeout error.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// HTTP error.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The transport has been closed.
    #[error("Transport closed")]
    Closed,
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_connect() {
            TransportError::Network(err.to_string())
        } else {
            TransportError::Http(err.to_string())
        }
    }
}

impl From<TransportError> for SmartsheetError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout(msg) => SmartsheetError::Network(NetworkError::Timeout(msg)),
            TransportError::Network(msg) => {
                SmartsheetError::Network(NetworkError::ConnectionFailed(msg))
            }
            TransportError::Http(msg) => SmartsheetError::Network(NetworkError::Request(msg)),
            TransportError::Closed => SmartsheetError::Network(NetworkError::Closed),
        }
    }
}

impl From<std::io::Error> for SmartsheetError {
    fn from(err: std::io::Error) -> Self {
        SmartsheetError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16, code: Option<i32>) -> ApiError {
        ApiError::new(
            status,
            code.map(|error_code| ErrorBody {
                error_code,
                message: "boom".to_string(),
                ref_id: None,
                detail: None,
            }),
        )
    }

    #[test]
    fn test_is_retryable() {
        assert!(SmartsheetError::ServiceUnavailable(api(503, None)).is_retryable());
        assert!(SmartsheetError::timeout("slow").is_retryable());
        assert!(SmartsheetError::network("refused").is_retryable());
        assert!(SmartsheetError::Rest(api(429, Some(4003))).is_retryable());

        assert!(!SmartsheetError::Rest(api(500, Some(1119))).is_retryable());
        assert!(!SmartsheetError::NotFound(api(404, Some(1006))).is_retryable());
        assert!(!SmartsheetError::InvalidRequest(api(400, Some(4004))).is_retryable());
        assert!(!SmartsheetError::decode(200, "bad json").is_retryable());
        assert!(!SmartsheetError::LengthMismatch(LengthMismatch {
            expected: 10,
            actual: 8
        })
        .is_retryable());
    }

    #[test]
    fn test_status_code_and_error_code() {
        let error = SmartsheetError::NotFound(api(404, Some(1006)));
        assert_eq!(error.status_code(), Some(404));
        assert_eq!(error.error_code(), Some(1006));
        assert_eq!(error.kind(), ErrorKind::NotFound);

        let error = SmartsheetError::decode(200, "eof");
        assert_eq!(error.status_code(), Some(200));
        assert_eq!(error.error_code(), None);
    }

    #[test]
    fn test_retry_exhausted_exposes_last_error() {
        let error = SmartsheetError::RetryExhausted {
            attempts: 4,
            elapsed: Duration::from_secs(16),
            last: Box::new(SmartsheetError::ServiceUnavailable(api(503, Some(4001)))),
        };
        assert_eq!(error.kind(), ErrorKind::RetryExhausted);
        assert_eq!(error.status_code(), Some(503));
        assert_eq!(error.error_code(), Some(4001));
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_api_error_display() {
        let mut error = api(404, Some(1006));
        error.body.as_mut().unwrap().ref_id = Some("abc123".to_string());
        assert_eq!(error.to_string(), "HTTP 404: boom (errorCode 1006) [refId abc123]");

        let mut raw = ApiError::new(502, None);
        raw.raw_body = Some("<html>bad gateway</html>".to_string());
        assert_eq!(raw.to_string(), "HTTP 502: <html>bad gateway</html>");
    }

    #[test]
    fn test_transport_error_conversion() {
        let error: SmartsheetError = TransportError::Timeout("read".to_string()).into();
        assert!(matches!(error, SmartsheetError::Network(NetworkError::Timeout(_))));

        let error: SmartsheetError = TransportError::Closed.into();
        assert!(matches!(error, SmartsheetError::Network(NetworkError::Closed)));
        assert!(!error.is_retryable());
    }
}
