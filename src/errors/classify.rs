//! Maps failed HTTP responses to typed errors.

use super::{ApiError, ErrorBody, ErrorKind, SmartsheetError};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use std::time::Duration;

/// Body error codes the service uses for transient conditions: system
/// maintenance, server timeout, rate limit and unexpected error.
pub const RETRYABLE_ERROR_CODES: [i32; 4] = [4001, 4002, 4003, 4004];

/// Classifies a non-success response into exactly one typed error.
///
/// The kind depends only on the status code. The raw status, the parsed error
/// body (or the raw text when it is not an error payload) and any
/// `Retry-After` hint are always preserved.
pub fn classify(status: u16, headers: &HeaderMap, body: &[u8]) -> SmartsheetError {
    let parsed: Option<ErrorBody> = serde_json::from_slice(body).ok();
    let raw_body = match parsed {
        Some(_) => None,
        None => Some(String::from_utf8_lossy(body).into_owned()),
    };

    let api = ApiError {
        status,
        body: parsed,
        raw_body,
        retry_after: parse_retry_after(headers),
    };

    SmartsheetError::from_api(ErrorKind::from_status(status), api)
}

/// Reads a `Retry-After` header expressed in whole seconds.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}
