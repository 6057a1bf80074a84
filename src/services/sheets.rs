//! Sheets service for the Smartsheet API.
//!
//! This module provides sheet operations:
//! - CRUD operations (list, get, create, update, delete)
//! - Export operations (PDF, Excel, CSV)

use crate::client::{with_query, RequestExecutor};
use crate::errors::{SmartsheetError, SmartsheetResult};
use crate::pagination::{PageIterator, PaginationParams};
use crate::serialization::PagedResult;
use crate::types::{ExportParams, Sheet, SheetExportFormat};
use std::io::Write;
use std::sync::Arc;
use tracing::debug;

/// Service for sheet operations.
pub struct SheetsService {
    executor: Arc<RequestExecutor>,
}

impl SheetsService {
    /// Creates a new sheets service.
    pub(crate) fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    // ========================================================================
    // CRUD Operations
    // ========================================================================

    /// Lists one page of the sheets the caller can access.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use integrations_smartsheet::*;
    /// # fn example(client: SmartsheetClient) -> SmartsheetResult<()> {
    /// let page = client.sheets().list(PaginationParams::new().with_page_size(50))?;
    /// for sheet in page.data {
    ///     println!("{:?}: {:?}", sheet.id, sheet.name);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn list(&self, params: PaginationParams) -> SmartsheetResult<PagedResult<Sheet>> {
        let path = with_query("sheets", &params)?;
        self.executor.list_paged(&path)
    }

    /// Lists every sheet, walking all pages.
    pub fn list_all(&self, page_size: Option<u32>) -> SmartsheetResult<Vec<Sheet>> {
        let params = PaginationParams {
            page_size,
            ..PaginationParams::new()
        };
        PageIterator::with_params(params, |params| self.list(params)).collect_all()
    }

    /// Gets a sheet with its columns and rows.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use integrations_smartsheet::*;
    /// # fn example(client: SmartsheetClient) -> SmartsheetResult<()> {
    /// let sheet = client.sheets().get(4583173393803140)?;
    /// println!("{} rows", sheet.rows.len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn get(&self, sheet_id: i64) -> SmartsheetResult<Sheet> {
        self.executor.fetch(&format!("sheets/{}", sheet_id))
    }

    /// Creates a sheet in the caller's home folder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use integrations_smartsheet::*;
    /// # use integrations_smartsheet::types::{Column, ColumnType, Sheet};
    /// # fn example(client: SmartsheetClient) -> SmartsheetResult<()> {
    /// let sheet = Sheet::new(
    ///     "Launch plan",
    ///     vec![
    ///         Column::new("Task", ColumnType::TextNumber).primary(),
    ///         Column::new("Done", ColumnType::Checkbox),
    ///     ],
    /// );
    /// let created = client.sheets().create(&sheet)?;
    /// println!("Created sheet {:?}", created.id);
    /// # Ok(())
    /// # }
    /// ```
    pub fn create(&self, sheet: &Sheet) -> SmartsheetResult<Sheet> {
        if sheet.name.as_deref().map_or(true, str::is_empty) {
            return Err(SmartsheetError::configuration("sheet name is required"));
        }
        if sheet.columns.is_empty() {
            return Err(SmartsheetError::configuration(
                "a new sheet needs at least one column",
            ));
        }

        self.executor.create("sheets", sheet)
    }

    /// Renames or otherwise updates a sheet.
    pub fn update(&self, sheet_id: i64, sheet: &Sheet) -> SmartsheetResult<Sheet> {
        self.executor.update(&format!("sheets/{}", sheet_id), sheet)
    }

    /// Deletes a sheet.
    pub fn delete(&self, sheet_id: i64) -> SmartsheetResult<()> {
        self.executor.remove(&format!("sheets/{}", sheet_id))
    }

    // ========================================================================
    // Export Operations
    // ========================================================================

    /// Exports a sheet and writes the file into `sink`.
    ///
    /// Returns the number of bytes written.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use integrations_smartsheet::*;
    /// # use integrations_smartsheet::types::{ExportParams, PaperSize, SheetExportFormat};
    /// # fn example(client: SmartsheetClient) -> SmartsheetResult<()> {
    /// let mut file = std::fs::File::create("plan.pdf")?;
    /// let params = ExportParams { paper_size: Some(PaperSize::A4) };
    /// client.sheets().export(4583173393803140, SheetExportFormat::Pdf, params, &mut file)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn export<W>(
        &self,
        sheet_id: i64,
        format: SheetExportFormat,
        params: ExportParams,
        sink: &mut W,
    ) -> SmartsheetResult<u64>
    where
        W: Write + ?Sized,
    {
        let params = match format {
            SheetExportFormat::Pdf => params,
            _ => ExportParams::default(),
        };
        let path = with_query(&format!("sheets/{}", sheet_id), &params)?;

        debug!(sheet_id, format = format.media_type(), "Exporting sheet");
        self.executor.fetch_raw(&path, format.media_type(), sink)
    }
}
