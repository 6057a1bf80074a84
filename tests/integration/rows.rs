//! Integration tests for row operations

use super::*;
use integrations_smartsheet::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, query_param};

#[test]
fn test_add_rows_sends_json_body() {
    let server = TestServer::start();
    server.mount(
        mock_with_auth("POST", "/2.0/sheets/7/rows")
            .and(header("content-type", "application/json"))
            .and(body_json(json!([
                {"toBottom": true, "cells": [{"columnId": 11, "value": "Write docs"}]}
            ])))
            .respond_with(result_response(json!([
                {"id": 101, "sheetId": 7, "rowNumber": 4, "cells": [{"columnId": 11, "value": "Write docs"}]}
            ])))
            .expect(1),
    );

    let rows = server
        .client()
        .rows()
        .add(7, &[Row::new(vec![Cell::new(11, "Write docs")])])
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].row_number, Some(4));
}

#[test]
fn test_partial_success_returns_accepted_and_failed_items() {
    let server = TestServer::start();
    server.mount(
        mock_with_auth("POST", "/2.0/sheets/7/rows")
            .and(query_param("allowPartialSuccess", "true"))
            .respond_with(success_response(json!({
                "message": "PARTIAL_SUCCESS",
                "resultCode": 3,
                "version": 12,
                "result": [{"id": 101}, {"id": 103}],
                "failedItems": [{
                    "index": 1,
                    "error": {"errorCode": 1036, "message": "The cell value in column 11 did not conform to the strict requirements for type CHECKBOX."},
                    "rowId": 102
                }]
            })))
            .expect(1),
    );

    let rows = vec![
        Row::new(vec![Cell::new(11, true)]),
        Row::new(vec![Cell::new(11, "not a bool")]),
        Row::new(vec![Cell::new(11, false)]),
    ];
    let outcome = server
        .client()
        .rows()
        .add_allowing_partial_success(7, &rows)
        .unwrap();

    assert!(outcome.is_partial_success());
    assert_eq!(outcome.version, Some(12));
    let ids: Vec<i64> = outcome.result.iter().filter_map(|r| r.id).collect();
    assert_eq!(ids, vec![101, 103]);
    assert_eq!(outcome.failed_items.len(), 1);
    let failure = &outcome.failed_items[0];
    assert_eq!(failure.index, 1);
    assert_eq!(failure.row_id, Some(102));
    assert_eq!(failure.error.error_code, 1036);
}

#[test]
fn test_update_rows_without_partial_success_fails_whole_batch() {
    let server = TestServer::start();
    server.mount(
        mock_with_auth("PUT", "/2.0/sheets/7/rows")
            .respond_with(error_response(400, 1036, "The cell value did not conform."))
            .expect(1),
    );

    let error = server
        .client()
        .rows()
        .update(7, &[Row::update(101, vec![Cell::new(11, "x")])])
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidRequest);
    assert_eq!(error.error_code(), Some(1036));
}

#[test]
fn test_delete_rows() {
    let server = TestServer::start();
    server.mount(
        mock_with_auth("DELETE", "/2.0/sheets/7/rows")
            .and(query_param("ids", "101,102"))
            .and(query_param("ignoreRowsNotFound", "true"))
            .respond_with(result_response(json!([101])))
            .expect(1),
    );

    let deleted = server.client().rows().delete(7, &[101, 102]).unwrap();
    assert_eq!(deleted, vec![101]);
}
