//! Integration tests for error classification

use super::*;
use integrations_smartsheet::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::ResponseTemplate;

#[test]
fn test_not_found_carries_error_body() {
    let server = TestServer::start();
    server.mount(
        mock_with_auth("GET", "/2.0/sheets/1")
            .respond_with(error_response(404, 1006, "Not Found"))
            .expect(1),
    );

    let error = server.client().sheets().get(1).unwrap_err();

    assert_eq!(error.kind(), ErrorKind::NotFound);
    assert_eq!(error.status_code(), Some(404));
    assert_eq!(error.error_code(), Some(1006));
    let api = error.api_error().unwrap();
    assert_eq!(api.message(), "Not Found");
    assert_eq!(api.ref_id(), Some("123abc"));
    assert!(!error.is_retryable());
}

#[test]
fn test_status_classification() {
    let cases = [
        (400, 1012, ErrorKind::InvalidRequest),
        (401, 1002, ErrorKind::Authorization),
        (403, 1004, ErrorKind::Authorization),
        (409, 1020, ErrorKind::Rest),
        (500, 4000, ErrorKind::Rest),
    ];

    for (status, code, expected) in cases {
        let server = TestServer::start();
        server.mount(
            mock_with_auth("GET", "/2.0/serverinfo")
                .respond_with(error_response(status, code, "failed"))
                .expect(1),
        );

        let error = server.client().server_info().get().unwrap_err();
        assert_eq!(error.kind(), expected, "status {}", status);
        assert_eq!(error.error_code(), Some(code));
    }
}

#[test]
fn test_unparseable_error_body_keeps_raw_text() {
    let server = TestServer::start();
    server.mount(
        mock_with_auth("GET", "/2.0/serverinfo")
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .expect(1),
    );

    let error = server.client().server_info().get().unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Rest);
    assert_eq!(error.error_code(), None);
    assert!(error.to_string().contains("Bad Gateway"));
}

#[test]
fn test_strict_decoding_rejects_unknown_fields() {
    let server = TestServer::start();
    server.mount(
        mock_with_auth("GET", "/2.0/sheets/5")
            .respond_with(success_response(json!({"id": 5, "name": "x", "ganttEnabled": true})))
            .expect(2),
    );

    let lenient = server.client();
    assert_eq!(lenient.sheets().get(5).unwrap().id, Some(5));

    let strict = server.client_builder().strict_decoding(true).build().unwrap();
    let error = strict.sheets().get(5).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Decode);
    assert!(error.to_string().contains("ganttEnabled"));
}

#[test]
fn test_invalid_body_is_decode_error() {
    let server = TestServer::start();
    server.mount(
        mock_with_auth("GET", "/2.0/sheets/5")
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"id\": "))
            .expect(1),
    );

    let error = server.client().sheets().get(5).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Decode);
}
