//! Columns service for the Smartsheet API.

use crate::client::{with_query, RequestExecutor};
use crate::errors::{SmartsheetError, SmartsheetResult};
use crate::pagination::PaginationParams;
use crate::serialization::PagedResult;
use crate::types::Column;
use std::sync::Arc;

/// Service for column operations.
pub struct ColumnsService {
    executor: Arc<RequestExecutor>,
}

impl ColumnsService {
    /// Creates a new columns service.
    pub(crate) fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Lists the columns of a sheet.
    pub fn list(&self, sheet_id: i64, params: PaginationParams) -> SmartsheetResult<PagedResult<Column>> {
        let path = with_query(&format!("sheets/{}/columns", sheet_id), &params)?;
        self.executor.list_paged(&path)
    }

    /// Gets one column.
    pub fn get(&self, sheet_id: i64, column_id: i64) -> SmartsheetResult<Column> {
        self.executor
            .fetch(&format!("sheets/{}/columns/{}", sheet_id, column_id))
    }

    /// Inserts columns. Each column needs a title, a type and an index.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use integrations_smartsheet::*;
    /// # use integrations_smartsheet::types::{Column, ColumnType};
    /// # fn example(client: SmartsheetClient) -> SmartsheetResult<()> {
    /// let columns = vec![Column::new("Owner", ColumnType::ContactList).at_index(2)];
    /// client.columns().add(4583173393803140, &columns)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn add(&self, sheet_id: i64, columns: &[Column]) -> SmartsheetResult<Vec<Column>> {
        if columns.is_empty() {
            return Err(SmartsheetError::configuration("at least one column is required"));
        }
        if let Some(index) = columns
            .iter()
            .position(|c| c.title.is_none() || c.column_type.is_none() || c.index.is_none())
        {
            return Err(SmartsheetError::configuration(format!(
                "column at index {} needs a title, a type and an index",
                index
            )));
        }

        self.executor
            .post_for_list(&format!("sheets/{}/columns", sheet_id), columns)
    }

    /// Updates a column's title, type, position or options.
    pub fn update(&self, sheet_id: i64, column_id: i64, column: &Column) -> SmartsheetResult<Column> {
        self.executor
            .update(&format!("sheets/{}/columns/{}", sheet_id, column_id), column)
    }

    /// Deletes a column.
    pub fn delete(&self, sheet_id: i64, column_id: i64) -> SmartsheetResult<()> {
        self.executor
            .remove(&format!("sheets/{}/columns/{}", sheet_id, column_id))
    }
}
