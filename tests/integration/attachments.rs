//! Integration tests for attachment uploads

use super::*;
use integrations_smartsheet::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::{Cursor, Read, Write};
use wiremock::matchers::{body_bytes, header};

fn uploaded(name: &str) -> serde_json::Value {
    json!({
        "id": 4583173393803140i64,
        "name": name,
        "attachmentType": "FILE",
        "mimeType": "text/csv",
        "parentType": "SHEET",
        "parentId": 1
    })
}

#[test]
fn test_attach_file_retries_and_resends_whole_file() {
    let mut file = tempfile::Builder::new()
        .prefix("owners")
        .suffix(".csv")
        .tempfile()
        .unwrap();
    let contents = b"task,owner\nwrite docs,kim\nship,lee\n".to_vec();
    file.write_all(&contents).unwrap();
    let name = file.path().file_name().unwrap().to_str().unwrap().to_string();

    let server = TestServer::start();
    server.mount(
        mock_with_auth("POST", "/2.0/sheets/1/attachments")
            .respond_with(error_response(503, 4002, "Server timeout exceeded."))
            .up_to_n_times(1)
            .expect(1),
    );
    server.mount(
        mock_with_auth("POST", "/2.0/sheets/1/attachments")
            .and(header("content-type", "text/csv"))
            .and(header(
                "content-disposition",
                format!("attachment; filename=\"{}\"", name).as_str(),
            ))
            .and(body_bytes(contents.clone()))
            .respond_with(result_response(uploaded(&name)))
            .expect(1),
    );

    let attachment = server
        .client()
        .attachments()
        .attach_file_to_sheet(1, file.path(), "text/csv")
        .unwrap();

    assert_eq!(attachment.name.as_deref(), Some(name.as_str()));
    let requests = server.received_requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].body, contents);
    assert_eq!(
        requests[1].headers.get("content-length").unwrap().to_str().unwrap(),
        contents.len().to_string()
    );
}

#[test]
fn test_attach_stream_to_row_encodes_filename() {
    let server = TestServer::start();
    server.mount(
        mock_with_auth("POST", "/2.0/sheets/1/rows/2/attachments")
            .and(header("content-disposition", "attachment; filename=\"q1%20report%2B.pdf\""))
            .and(body_bytes(vec![9u8; 512]))
            .respond_with(result_response(uploaded("q1 report+.pdf")))
            .expect(1),
    );

    let attachment = server
        .client()
        .attachments()
        .attach_stream_to_row(1, 2, Cursor::new(vec![9u8; 512]), 512, "q1 report+.pdf", "application/pdf")
        .unwrap();
    assert_eq!(attachment.attachment_type, Some(AttachmentType::File));
}

#[test]
fn test_attach_stream_is_attempted_once() {
    let server = TestServer::start();
    server.mount(
        mock_with_auth("POST", "/2.0/sheets/1/attachments")
            .respond_with(error_response(503, 4001, "maintenance"))
            .expect(1),
    );

    let hook = counting_hook();
    let client = server.client_builder().retry_hook(hook.clone()).build().unwrap();
    let error = client
        .attachments()
        .attach_stream_to_sheet(1, Cursor::new(b"abc".to_vec()), 3, "a.txt", "text/plain")
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::ServiceUnavailable);
    assert_eq!(hook.waits(), 0);
}

#[test]
fn test_short_stream_fails_with_length_mismatch() {
    let server = TestServer::start();
    server.mount(
        mock_with_auth("POST", "/2.0/sheets/1/attachments")
            .respond_with(result_response(uploaded("short.bin"))),
    );

    let error = server
        .client()
        .attachments()
        .attach_stream_to_sheet(1, Cursor::new(vec![1u8; 80]), 100, "short.bin", "application/octet-stream")
        .unwrap_err();

    match error {
        SmartsheetError::LengthMismatch(mismatch) => {
            assert_eq!(mismatch.expected, 100);
            assert_eq!(mismatch.actual, 80);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_long_stream_fails_with_length_mismatch() {
    let server = TestServer::start();
    server.mount(
        mock_with_auth("POST", "/2.0/sheets/1/attachments")
            .respond_with(result_response(uploaded("long.bin"))),
    );

    let error = server
        .client()
        .attachments()
        .attach_stream_to_sheet(1, Cursor::new(vec![1u8; 120]), 100, "long.bin", "application/octet-stream")
        .unwrap_err();

    match error {
        SmartsheetError::LengthMismatch(mismatch) => {
            assert_eq!(mismatch.expected, 100);
            assert!(mismatch.actual > 100);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

/// Hands out at most ten bytes per read.
struct Trickle(Cursor<Vec<u8>>);

impl Read for Trickle {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let len = buf.len().min(10);
        self.0.read(&mut buf[..len])
    }
}

#[test]
fn test_long_trickling_stream_fails_with_length_mismatch() {
    let server = TestServer::start();
    server.mount(
        mock_with_auth("POST", "/2.0/sheets/1/attachments")
            .respond_with(result_response(uploaded("long.bin"))),
    );

    let error = server
        .client()
        .attachments()
        .attach_stream_to_sheet(1, Trickle(Cursor::new(vec![1u8; 120])), 100, "long.bin", "application/octet-stream")
        .unwrap_err();

    assert!(matches!(error, SmartsheetError::LengthMismatch(_)), "{error:?}");
}

#[test]
fn test_attach_url() {
    let server = TestServer::start();
    server.mount(
        mock_with_auth("POST", "/2.0/sheets/1/attachments")
            .and(header("content-type", "application/json"))
            .respond_with(result_response(json!({
                "id": 5,
                "name": "Runbook",
                "url": "https://wiki.example.com/runbook",
                "attachmentType": "LINK"
            })))
            .expect(1),
    );

    let link = server
        .client()
        .attachments()
        .attach_url_to_sheet(1, &Attachment::link("Runbook", "https://wiki.example.com/runbook"))
        .unwrap();
    assert_eq!(link.attachment_type, Some(AttachmentType::Link));
}
