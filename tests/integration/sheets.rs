//! Integration tests for sheets, headers and credentials

use super::*;
use integrations_smartsheet::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[test]
fn test_get_sheet_decodes_columns_and_rows() {
    let server = TestServer::start();
    server.mount(
        mock_with_auth("GET", "/2.0/sheets/4583173393803140")
            .respond_with(success_response(json!({
                "id": 4583173393803140i64,
                "name": "Launch plan",
                "accessLevel": "OWNER",
                "version": 7,
                "totalRowCount": 1,
                "columns": [
                    {"id": 7960873114331012i64, "index": 0, "title": "Task", "type": "TEXT_NUMBER", "primary": true},
                    {"id": 642523719853956i64, "index": 1, "title": "Done", "type": "CHECKBOX"}
                ],
                "rows": [{
                    "id": 2361756178769796i64,
                    "rowNumber": 1,
                    "cells": [
                        {"columnId": 7960873114331012i64, "value": "Write docs", "displayValue": "Write docs"},
                        {"columnId": 642523719853956i64, "value": true}
                    ]
                }]
            })))
            .expect(1),
    );

    let client = server.client();
    let sheet = client.sheets().get(4583173393803140).unwrap();

    assert_eq!(sheet.name.as_deref(), Some("Launch plan"));
    assert_eq!(sheet.access_level, Some(AccessLevel::Owner));
    let done = sheet.column_by_title("Done").unwrap();
    assert_eq!(done.column_type, Some(ColumnType::Checkbox));
    assert_eq!(
        sheet.rows[0].cell(done.id.unwrap()).unwrap().value,
        Some(json!(true))
    );
}

#[test]
fn test_identity_headers_are_sent() {
    let server = TestServer::start();
    server.mount(
        mock_with_auth("GET", "/2.0/users/me")
            .and(header("assume-user", "kim.lee%2Bops%40example.com"))
            .and(header("smartsheet-change-agent", "inventory-sync"))
            .and(header("accept", "application/json"))
            .respond_with(success_response(json!({"id": 1, "email": "kim.lee+ops@example.com"})))
            .expect(1),
    );

    let client = server
        .client_builder()
        .assumed_user("kim.lee+ops@example.com")
        .change_agent("inventory-sync")
        .build()
        .unwrap();

    let me = client.users().me().unwrap();
    assert_eq!(me.email.as_deref(), Some("kim.lee+ops@example.com"));

    let requests = server.received_requests();
    let user_agent = requests[0].headers.get("user-agent").unwrap().to_str().unwrap();
    assert!(user_agent.starts_with("integrations-smartsheet/"));
}

#[test]
fn test_token_update_is_visible_to_next_request() {
    let server = TestServer::start();
    server.mount(
        Mock::given(method("GET"))
            .and(path("/2.0/serverinfo"))
            .and(header("Authorization", "Bearer first-token"))
            .respond_with(success_response(json!({"supportedLocales": ["en_US"]})))
            .expect(1),
    );
    server.mount(
        Mock::given(method("GET"))
            .and(path("/2.0/serverinfo"))
            .and(header("Authorization", "Bearer second-token"))
            .respond_with(success_response(json!({"supportedLocales": ["en_US"]})))
            .expect(1),
    );

    let client = server.client_builder().access_token("first-token").build().unwrap();
    client.server_info().get().unwrap();
    client.set_access_token("second-token");
    client.server_info().get().unwrap();

    assert_eq!(client.credentials().access_token(), "second-token");
}

#[test]
fn test_list_all_walks_pages() {
    let server = TestServer::start();
    for page in 1..=3 {
        let data = if page < 3 {
            json!([{"id": page * 10}, {"id": page * 10 + 1}])
        } else {
            json!([{"id": 30}])
        };
        server.mount(
            mock_with_auth("GET", "/2.0/sheets")
                .and(query_param("page", page.to_string().as_str()))
                .and(query_param("pageSize", "2"))
                .respond_with(success_response(json!({
                    "pageNumber": page,
                    "pageSize": 2,
                    "totalPages": 3,
                    "totalCount": 5,
                    "data": data
                })))
                .expect(1),
        );
    }

    let client = server.client();
    let sheets = client.sheets().list_all(Some(2)).unwrap();
    let ids: Vec<i64> = sheets.iter().filter_map(|s| s.id).collect();
    assert_eq!(ids, vec![10, 11, 20, 21, 30]);
}

#[test]
fn test_export_pdf_streams_to_sink() {
    let server = TestServer::start();
    let pdf: Vec<u8> = b"%PDF-1.7\n"
        .iter()
        .copied()
        .chain((0..40_000u32).map(|i| (i % 251) as u8))
        .collect();
    server.mount(
        mock_with_auth("GET", "/2.0/sheets/9")
            .and(header("accept", "application/pdf"))
            .and(query_param("paperSize", "A4"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(pdf.clone(), "application/pdf"))
            .expect(1),
    );

    let client = server.client_builder().download_buffer_size(1024).build().unwrap();
    let mut sink = Vec::new();
    let written = client
        .sheets()
        .export(
            9,
            SheetExportFormat::Pdf,
            ExportParams {
                paper_size: Some(PaperSize::A4),
            },
            &mut sink,
        )
        .unwrap();

    assert_eq!(written, pdf.len() as u64);
    assert_eq!(sink, pdf);
}

#[test]
fn test_closed_client_fails_without_sending() {
    let server = TestServer::start();
    server.mount(
        mock_with_auth("GET", "/2.0/serverinfo")
            .respond_with(success_response(json!({})))
            .expect(0),
    );

    let client = server.client();
    client.close();

    let error = client.server_info().get().unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Network);
}
