//! Rows service for the Smartsheet API.

use crate::client::{with_query, RequestExecutor};
use crate::errors::{SmartsheetError, SmartsheetResult};
use crate::serialization::BulkItemResult;
use crate::types::Row;
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PartialSuccessQuery {
    allow_partial_success: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteRowsQuery {
    ids: String,
    ignore_rows_not_found: bool,
}

/// Service for row operations.
pub struct RowsService {
    executor: Arc<RequestExecutor>,
}

impl RowsService {
    /// Creates a new rows service.
    pub(crate) fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Gets one row.
    pub fn get(&self, sheet_id: i64, row_id: i64) -> SmartsheetResult<Row> {
        self.executor
            .fetch(&format!("sheets/{}/rows/{}", sheet_id, row_id))
    }

    /// Adds rows to a sheet. The whole batch fails if any row is rejected.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use integrations_smartsheet::*;
    /// # use integrations_smartsheet::types::{Cell, Row};
    /// # fn example(client: SmartsheetClient) -> SmartsheetResult<()> {
    /// let rows = vec![Row::new(vec![Cell::new(7960873114331012, "Write docs")])];
    /// let added = client.rows().add(4583173393803140, &rows)?;
    /// println!("Added {} rows", added.len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn add(&self, sheet_id: i64, rows: &[Row]) -> SmartsheetResult<Vec<Row>> {
        ensure_not_empty(rows)?;
        self.executor
            .post_for_list(&format!("sheets/{}/rows", sheet_id), rows)
    }

    /// Adds rows, keeping the ones the service accepts.
    ///
    /// Rejected rows are listed in [`BulkItemResult::failed_items`] by their
    /// index in `rows`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use integrations_smartsheet::*;
    /// # use integrations_smartsheet::types::{Cell, Row};
    /// # fn example(client: SmartsheetClient, rows: Vec<Row>) -> SmartsheetResult<()> {
    /// let outcome = client.rows().add_allowing_partial_success(4583173393803140, &rows)?;
    /// for failure in &outcome.failed_items {
    ///     println!("row {} rejected: {:?}", failure.index, failure.error.message);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn add_allowing_partial_success(
        &self,
        sheet_id: i64,
        rows: &[Row],
    ) -> SmartsheetResult<BulkItemResult<Row>> {
        ensure_not_empty(rows)?;
        let path = with_query(
            &format!("sheets/{}/rows", sheet_id),
            &PartialSuccessQuery {
                allow_partial_success: true,
            },
        )?;
        self.executor.post_for_bulk(&path, rows)
    }

    /// Updates rows. Each row must carry its ID.
    pub fn update(&self, sheet_id: i64, rows: &[Row]) -> SmartsheetResult<Vec<Row>> {
        ensure_identified(rows)?;
        self.executor
            .put_for_list(&format!("sheets/{}/rows", sheet_id), rows)
    }

    /// Updates rows, keeping the updates the service accepts.
    pub fn update_allowing_partial_success(
        &self,
        sheet_id: i64,
        rows: &[Row],
    ) -> SmartsheetResult<BulkItemResult<Row>> {
        ensure_identified(rows)?;
        let path = with_query(
            &format!("sheets/{}/rows", sheet_id),
            &PartialSuccessQuery {
                allow_partial_success: true,
            },
        )?;
        self.executor.put_for_bulk(&path, rows)
    }

    /// Deletes rows and returns the IDs that were deleted.
    ///
    /// IDs that no longer exist are skipped.
    pub fn delete(&self, sheet_id: i64, row_ids: &[i64]) -> SmartsheetResult<Vec<i64>> {
        if row_ids.is_empty() {
            return Err(SmartsheetError::configuration("at least one row ID is required"));
        }

        let ids = row_ids
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let path = with_query(
            &format!("sheets/{}/rows", sheet_id),
            &DeleteRowsQuery {
                ids,
                ignore_rows_not_found: true,
            },
        )?;
        self.executor.remove_for_list(&path)
    }
}

fn ensure_not_empty(rows: &[Row]) -> SmartsheetResult<()> {
    if rows.is_empty() {
        return Err(SmartsheetError::configuration("at least one row is required"));
    }
    Ok(())
}

fn ensure_identified(rows: &[Row]) -> SmartsheetResult<()> {
    ensure_not_empty(rows)?;
    if let Some(index) = rows.iter().position(|r| r.id.is_none()) {
        return Err(SmartsheetError::configuration(format!(
            "row at index {} has no ID",
            index
        )));
    }
    Ok(())
}
