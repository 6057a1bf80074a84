//! Integration tests for retry behaviour

use super::*;
use integrations_smartsheet::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::{Duration, Instant};

#[test]
fn test_service_unavailable_is_retried_until_success() {
    let server = TestServer::start();
    server.mount(
        mock_with_auth("GET", "/2.0/sheets/1")
            .respond_with(error_response(503, 4001, "Smartsheet is undergoing maintenance"))
            .up_to_n_times(3)
            .expect(3),
    );
    server.mount(
        mock_with_auth("GET", "/2.0/sheets/1")
            .respond_with(success_response(json!({"id": 1, "name": "Recovered"})))
            .expect(1),
    );

    let hook = counting_hook();
    let client = server
        .client_builder()
        .retry(fast_retry(5))
        .retry_hook(hook.clone())
        .build()
        .unwrap();

    let sheet = client.sheets().get(1).unwrap();
    assert_eq!(sheet.name.as_deref(), Some("Recovered"));
    assert_eq!(hook.waits(), 3);
    assert_eq!(server.received_requests().len(), 4);
}

#[test]
fn test_rate_limit_code_is_retried() {
    let server = TestServer::start();
    server.mount(
        mock_with_auth("GET", "/2.0/serverinfo")
            .respond_with(error_response(429, 4003, "Rate limit exceeded."))
            .up_to_n_times(1)
            .expect(1),
    );
    server.mount(
        mock_with_auth("GET", "/2.0/serverinfo")
            .respond_with(success_response(json!({"supportedLocales": ["en_US"]})))
            .expect(1),
    );

    let info = server.client().server_info().get().unwrap();
    assert_eq!(info.supported_locales, vec!["en_US"]);
}

#[test]
fn test_exhausted_retries_wrap_last_error() {
    let server = TestServer::start();
    server.mount(
        mock_with_auth("GET", "/2.0/sheets/1")
            .respond_with(error_response(503, 4001, "down"))
            .expect(3),
    );

    let hook = counting_hook();
    let client = server
        .client_builder()
        .retry(fast_retry(3))
        .retry_hook(hook.clone())
        .build()
        .unwrap();

    let error = client.sheets().get(1).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::RetryExhausted);
    assert_eq!(error.status_code(), Some(503));
    assert_eq!(error.error_code(), Some(4001));
    match error {
        SmartsheetError::RetryExhausted { attempts, last, .. } => {
            assert_eq!(attempts, 3);
            assert_eq!(last.kind(), ErrorKind::ServiceUnavailable);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(hook.waits(), 2);
}

#[test]
fn test_elapsed_ceiling_bounds_unlimited_attempts() {
    let server = TestServer::start();
    server.mount(
        mock_with_auth("GET", "/2.0/sheets/1").respond_with(error_response(503, 4001, "down")),
    );

    let client = server
        .client_builder()
        .retry(RetryConfig {
            max_attempts: None,
            initial_backoff: Duration::from_millis(20),
            max_backoff: Duration::from_millis(50),
            jitter: 0.0,
            max_elapsed: Duration::from_millis(300),
            ..RetryConfig::default()
        })
        .build()
        .unwrap();

    let started = Instant::now();
    let error = client.sheets().get(1).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::RetryExhausted);
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(server.received_requests().len() >= 2);
}

#[test]
fn test_client_errors_are_not_retried() {
    let server = TestServer::start();
    server.mount(
        mock_with_auth("GET", "/2.0/sheets/1")
            .respond_with(error_response(400, 1012, "Required object attribute(s) are missing"))
            .expect(1),
    );

    let error = server.client().sheets().get(1).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidRequest);
}
