//! Request executor with credentials, retry and error classification.

use crate::auth::{CredentialStore, Credentials};
use crate::config::SmartsheetConfig;
use crate::errors::{classify, ConfigurationError, SmartsheetError, SmartsheetResult};
use crate::resilience::RetryExecutor;
use crate::serialization::{ApiResult, BulkItemResult, EnvelopeShape, JsonSerializer, PagedResult};
use crate::transport::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, LengthEnforcingReader, RequestBody,
};
use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE,
    USER_AGENT,
};
use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace, warn};
use url::Url;

/// Header that makes the service act on behalf of another user.
pub const ASSUME_USER_HEADER: &str = "assume-user";

/// Header identifying the application that makes a change.
pub const CHANGE_AGENT_HEADER: &str = "smartsheet-change-agent";

/// JSON media type.
pub const APPLICATION_JSON: &str = "application/json";

/// Characters left as-is when encoding header values; matches form encoding.
const HEADER_VALUE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'.')
    .remove(b'-')
    .remove(b'_')
    .remove(b'*');

/// Body of one attempt.
enum Payload<'a> {
    Empty,
    Json(&'a Bytes),
    Upload {
        reader: Box<dyn Read + Send>,
        length: u64,
        content_type: &'a str,
        filename: &'a str,
    },
}

/// Request executor shared by every resource service.
///
/// Each operation:
/// - builds the URL and headers from one credentials snapshot per attempt
/// - sends the request through the transport
/// - decodes a `200` body in the envelope the caller asked for
/// - classifies any other status into a typed error
/// - retries transient failures through the [`RetryExecutor`]
///
/// Responses are owned values; every exit path drops them, which returns the
/// connection to the pool.
pub struct RequestExecutor {
    base_url: Url,
    transport: Arc<dyn HttpTransport>,
    credentials: Arc<CredentialStore>,
    serializer: JsonSerializer,
    retry: RetryExecutor,
    user_agent: String,
    timeout: Duration,
    download_buffer_size: usize,
    log_bodies: bool,
}

impl RequestExecutor {
    /// Creates a new request executor.
    pub fn new(
        config: &SmartsheetConfig,
        transport: Arc<dyn HttpTransport>,
        credentials: Arc<CredentialStore>,
    ) -> Self {
        let mut retry = RetryExecutor::new(config.retry.clone());
        if let Some(policy) = &config.backoff_policy {
            retry = retry.with_policy(policy.clone());
        }
        if let Some(hook) = &config.retry_hook {
            retry = retry.with_hook(hook.clone());
        }

        Self {
            base_url: config.base_url.clone(),
            transport,
            credentials,
            serializer: JsonSerializer::new(config.strict_decoding),
            retry,
            user_agent: config.user_agent.clone(),
            timeout: config.timeout,
            download_buffer_size: config.download_buffer_size,
            log_bodies: config.log_bodies,
        }
    }

    /// Returns the credential store read by every request.
    pub fn credentials(&self) -> &Arc<CredentialStore> {
        &self.credentials
    }

    /// Returns the transport.
    pub fn transport(&self) -> &Arc<dyn HttpTransport> {
        &self.transport
    }

    // ===== JSON verbs =====

    /// Issues a GET and decodes the body as `T`.
    pub fn fetch<T>(&self, path: &str) -> SmartsheetResult<T>
    where
        T: DeserializeOwned + Serialize,
    {
        self.execute_json(HttpMethod::Get, path, None, |serializer, status, body| {
            serializer.decode(status, body)
        })
    }

    /// POSTs `body` and unwraps the created object from the result envelope.
    pub fn create<B, T>(&self, path: &str, body: &B) -> SmartsheetResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Serialize,
    {
        let body = self.encode(body)?;
        self.execute_json(HttpMethod::Post, path, Some(&body), unwrap_result)
    }

    /// PUTs `body` and unwraps the updated object from the result envelope.
    pub fn update<B, T>(&self, path: &str, body: &B) -> SmartsheetResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Serialize,
    {
        let body = self.encode(body)?;
        self.execute_json(HttpMethod::Put, path, Some(&body), unwrap_result)
    }

    /// Issues a DELETE and discards the response body.
    pub fn remove(&self, path: &str) -> SmartsheetResult<()> {
        self.execute_json(HttpMethod::Delete, path, None, |_, _, _| Ok(()))
    }

    /// Issues a DELETE and unwraps the list carried by the result envelope.
    pub fn remove_for_list<T>(&self, path: &str) -> SmartsheetResult<Vec<T>>
    where
        T: DeserializeOwned + Serialize,
    {
        self.execute_json(HttpMethod::Delete, path, None, unwrap_result)
    }

    /// Issues a GET and decodes a bare JSON array.
    pub fn list<T>(&self, path: &str) -> SmartsheetResult<Vec<T>>
    where
        T: DeserializeOwned + Serialize,
    {
        self.execute_json(HttpMethod::Get, path, None, |serializer, status, body| {
            serializer
                .decode_envelope(status, body, EnvelopeShape::List)
                .map(|envelope| envelope.into_list())
        })
    }

    /// Issues a GET and decodes one page of a paged listing.
    pub fn list_paged<T>(&self, path: &str) -> SmartsheetResult<PagedResult<T>>
    where
        T: DeserializeOwned + Serialize,
    {
        self.execute_json(HttpMethod::Get, path, None, |serializer, status, body| {
            serializer.decode(status, body)
        })
    }

    /// POSTs `body` and unwraps the list carried by the result envelope.
    pub fn post_for_list<B, T>(&self, path: &str, body: &B) -> SmartsheetResult<Vec<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Serialize,
    {
        let body = self.encode(body)?;
        self.execute_json(HttpMethod::Post, path, Some(&body), unwrap_result)
    }

    /// PUTs `body` and unwraps the list carried by the result envelope.
    pub fn put_for_list<B, T>(&self, path: &str, body: &B) -> SmartsheetResult<Vec<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Serialize,
    {
        let body = self.encode(body)?;
        self.execute_json(HttpMethod::Put, path, Some(&body), unwrap_result)
    }

    /// POSTs `body` and decodes a bulk result. Rejected items are reported
    /// inside the result, not as an error.
    pub fn post_for_bulk<B, T>(&self, path: &str, body: &B) -> SmartsheetResult<BulkItemResult<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Serialize,
    {
        let body = self.encode(body)?;
        self.execute_json(HttpMethod::Post, path, Some(&body), |serializer, status, body| {
            serializer.decode(status, body)
        })
    }

    /// PUTs `body` and decodes a bulk result.
    pub fn put_for_bulk<B, T>(&self, path: &str, body: &B) -> SmartsheetResult<BulkItemResult<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Serialize,
    {
        let body = self.encode(body)?;
        self.execute_json(HttpMethod::Put, path, Some(&body), |serializer, status, body| {
            serializer.decode(status, body)
        })
    }

    // ===== Streaming =====

    /// Uploads `length` bytes from a one-shot reader.
    ///
    /// The body cannot be replayed, so the request is attempted exactly once
    /// and a retryable failure is returned unchanged. A reader that yields
    /// more or fewer than `length` bytes fails with
    /// [`SmartsheetError::LengthMismatch`].
    pub fn attach_stream<R, T>(
        &self,
        path: &str,
        reader: R,
        content_type: &str,
        length: u64,
        filename: &str,
    ) -> SmartsheetResult<T>
    where
        R: Read + Send + 'static,
        T: DeserializeOwned + Serialize,
    {
        let url = self.build_url(path)?;
        let payload = Payload::Upload {
            reader: Box::new(reader),
            length,
            content_type,
            filename,
        };

        let response = self.send_once(HttpMethod::Post, &url, APPLICATION_JSON, payload, 1)?;
        self.read_json(response, unwrap_result)
    }

    /// Uploads a file from disk.
    ///
    /// The file is reopened for every attempt, so transient failures are
    /// retried. The length is read from file metadata once; a file that
    /// changes size between attempts fails with a length mismatch.
    pub fn attach_file<T>(
        &self,
        path: &str,
        file: &Path,
        content_type: &str,
        filename: &str,
    ) -> SmartsheetResult<T>
    where
        T: DeserializeOwned + Serialize,
    {
        let url = self.build_url(path)?;
        let length = std::fs::metadata(file)?.len();
        let operation = format!("POST {}", path);

        self.retry.execute(&operation, |attempt| {
            let source = File::open(file)?;
            let payload = Payload::Upload {
                reader: Box::new(source),
                length,
                content_type,
                filename,
            };
            let response = self.send_once(HttpMethod::Post, &url, APPLICATION_JSON, payload, attempt)?;
            self.read_json(response, unwrap_result)
        })
    }

    /// Issues a GET with the given `Accept` type and copies the raw body into
    /// `sink`. Returns the number of bytes copied.
    ///
    /// Failed statuses are classified before any byte reaches the sink. Once
    /// copying has started, failures are not retried.
    pub fn fetch_raw<W>(&self, path: &str, accept: &str, sink: &mut W) -> SmartsheetResult<u64>
    where
        W: Write + ?Sized,
    {
        let url = self.build_url(path)?;
        let operation = format!("GET {}", path);

        let response = self.retry.execute(&operation, |attempt| {
            self.send_once(HttpMethod::Get, &url, accept, Payload::Empty, attempt)
        })?;

        let copied = response.copy_to(sink, self.download_buffer_size)?;
        debug!(path = %path, bytes = copied, "Copied raw response body");
        Ok(copied)
    }

    // ===== Helpers =====

    /// Builds a full URL from a path relative to the base URL. The path may
    /// carry a query string.
    pub fn build_url(&self, path: &str) -> SmartsheetResult<Url> {
        let path = path.trim_start_matches('/');

        self.base_url.join(path).map_err(|e| {
            SmartsheetError::Configuration(ConfigurationError::InvalidBaseUrl(format!(
                "Cannot join '{}' onto {}: {}",
                path, self.base_url, e
            )))
        })
    }

    fn encode<B: Serialize + ?Sized>(&self, body: &B) -> SmartsheetResult<Bytes> {
        let bytes = self.serializer.encode(body)?;
        if self.log_bodies {
            trace!(body = %String::from_utf8_lossy(&bytes), "Request body");
        }
        Ok(Bytes::from(bytes))
    }

    fn execute_json<T, D>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Bytes>,
        decode: D,
    ) -> SmartsheetResult<T>
    where
        D: Fn(&JsonSerializer, u16, &[u8]) -> SmartsheetResult<T>,
    {
        let url = self.build_url(path)?;
        let operation = format!("{} {}", method.as_str(), path);

        self.retry.execute(&operation, |attempt| {
            let payload = match body {
                Some(bytes) => Payload::Json(bytes),
                None => Payload::Empty,
            };
            let response = self.send_once(method, &url, APPLICATION_JSON, payload, attempt)?;
            self.read_json(response, &decode)
        })
    }

    /// Sends one attempt and returns the response if its status is `200`.
    fn send_once(
        &self,
        method: HttpMethod,
        url: &Url,
        accept: &str,
        payload: Payload<'_>,
        attempt: u32,
    ) -> SmartsheetResult<HttpResponse> {
        let credentials = self.credentials.snapshot();
        let mut headers = self.build_headers(&credentials, accept)?;

        let mut guard = None;
        let body = match payload {
            Payload::Empty => RequestBody::Empty,
            Payload::Json(bytes) => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
                RequestBody::Bytes(bytes.clone())
            }
            Payload::Upload {
                reader,
                length,
                content_type,
                filename,
            } => {
                headers.insert(CONTENT_TYPE, header_value(content_type)?);
                headers.insert(
                    CONTENT_DISPOSITION,
                    header_value(&format!(
                        "attachment; filename=\"{}\"",
                        utf8_percent_encode(filename, HEADER_VALUE_SET)
                    ))?,
                );
                let reader = LengthEnforcingReader::new(reader, length);
                guard = Some(reader.guard());
                RequestBody::Sized {
                    reader: Box::new(reader),
                    length,
                }
            }
        };

        debug!(
            method = method.as_str(),
            url = %url,
            attempt = attempt,
            "Sending request"
        );

        let request = HttpRequest {
            method,
            url: url.clone(),
            headers,
            body,
            timeout: Some(self.timeout),
        };

        let result = self.transport.send(request);

        if let Some(mismatch) = guard.and_then(|g| g.tripped()) {
            warn!(
                expected = mismatch.expected,
                actual = mismatch.actual,
                "Upload body length mismatch"
            );
            return Err(mismatch.into());
        }

        let response = result?;
        if response.status == StatusCode::OK {
            return Ok(response);
        }

        let status = response.status.as_u16();
        let headers = response.headers.clone();
        let (body, unread) = match response.into_bytes() {
            Ok(body) => (body, None),
            Err(e) => {
                warn!(status = status, error = %e, "Failed to read error response body");
                (Bytes::new(), Some(e.to_string()))
            }
        };
        let mut error = classify(status, &headers, &body);
        if let (Some(reason), Some(api)) = (unread, error.api_error_mut()) {
            api.raw_body = Some(reason);
        }

        warn!(
            method = method.as_str(),
            url = %url,
            status = status,
            error_code = ?error.error_code(),
            kind = %error.kind(),
            "Request failed"
        );

        Err(error)
    }

    fn read_json<T, D>(&self, response: HttpResponse, decode: D) -> SmartsheetResult<T>
    where
        D: FnOnce(&JsonSerializer, u16, &[u8]) -> SmartsheetResult<T>,
    {
        let status = response.status.as_u16();
        let body = response.into_bytes()?;

        debug!(status = status, bytes = body.len(), "Received response");
        if self.log_bodies {
            trace!(body = %String::from_utf8_lossy(&body), "Response body");
        }

        decode(&self.serializer, status, &body)
    }

    fn build_headers(&self, credentials: &Credentials, accept: &str) -> SmartsheetResult<HeaderMap> {
        let mut headers = HeaderMap::new();

        let mut authorization = header_value(&format!("Bearer {}", credentials.access_token()))?;
        authorization.set_sensitive(true);
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(USER_AGENT, header_value(&self.user_agent)?);
        headers.insert(ACCEPT, header_value(accept)?);

        if let Some(user) = credentials.assumed_user() {
            let encoded = utf8_percent_encode(user, HEADER_VALUE_SET).to_string();
            headers.insert(HeaderName::from_static(ASSUME_USER_HEADER), header_value(&encoded)?);
        }

        if let Some(agent) = credentials.change_agent() {
            let encoded = utf8_percent_encode(agent, HEADER_VALUE_SET).to_string();
            headers.insert(HeaderName::from_static(CHANGE_AGENT_HEADER), header_value(&encoded)?);
        }

        Ok(headers)
    }
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("base_url", &self.base_url.as_str())
            .field("serializer", &self.serializer)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

/// Appends a serialized query to a path.
pub fn with_query<Q: Serialize + ?Sized>(path: &str, query: &Q) -> SmartsheetResult<String> {
    let encoded = serde_urlencoded::to_string(query)
        .map_err(|e| SmartsheetError::serialization(format!("Failed to encode query: {}", e)))?;

    if encoded.is_empty() {
        Ok(path.to_string())
    } else if path.contains('?') {
        Ok(format!("{}&{}", path, encoded))
    } else {
        Ok(format!("{}?{}", path, encoded))
    }
}

fn header_value(value: &str) -> SmartsheetResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| {
        SmartsheetError::Configuration(ConfigurationError::InvalidHeader(e.to_string()))
    })
}

fn unwrap_result<T>(serializer: &JsonSerializer, status: u16, body: &[u8]) -> SmartsheetResult<T>
where
    T: DeserializeOwned + Serialize,
{
    let envelope: ApiResult<T> = serializer.decode(status, body)?;
    envelope
        .result
        .ok_or_else(|| SmartsheetError::decode(status, "result envelope carries no result"))
}
