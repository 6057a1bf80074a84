//! Attachments service for the Smartsheet API.
//!
//! This module provides attachment operations:
//! - Listing and metadata retrieval
//! - File uploads to sheets and rows, from disk or from a one-shot reader
//! - URL attachments
//!
//! Uploads from disk are retried on transient failures because the file can
//! be reopened. Uploads from a reader are attempted once.

use crate::client::{with_query, RequestExecutor};
use crate::errors::{ConfigurationError, SmartsheetError, SmartsheetResult};
use crate::pagination::PaginationParams;
use crate::serialization::PagedResult;
use crate::types::{Attachment, AttachmentType};
use mime::Mime;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Service for attachment operations.
pub struct AttachmentsService {
    executor: Arc<RequestExecutor>,
}

impl AttachmentsService {
    /// Creates a new attachments service.
    pub(crate) fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    // ========================================================================
    // Metadata Operations
    // ========================================================================

    /// Lists the attachments on a sheet and its rows.
    pub fn list(
        &self,
        sheet_id: i64,
        params: PaginationParams,
    ) -> SmartsheetResult<PagedResult<Attachment>> {
        let path = with_query(&format!("sheets/{}/attachments", sheet_id), &params)?;
        self.executor.list_paged(&path)
    }

    /// Gets an attachment. File attachments carry a temporary download URL.
    pub fn get(&self, sheet_id: i64, attachment_id: i64) -> SmartsheetResult<Attachment> {
        self.executor
            .fetch(&format!("sheets/{}/attachments/{}", sheet_id, attachment_id))
    }

    /// Deletes an attachment.
    pub fn delete(&self, sheet_id: i64, attachment_id: i64) -> SmartsheetResult<()> {
        self.executor
            .remove(&format!("sheets/{}/attachments/{}", sheet_id, attachment_id))
    }

    // ========================================================================
    // Upload Operations
    // ========================================================================

    /// Uploads a file from disk to a sheet.
    ///
    /// # Arguments
    ///
    /// * `sheet_id` - Target sheet
    /// * `file` - File to upload; its name is used as the attachment name
    /// * `content_type` - MIME type of the file
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use integrations_smartsheet::*;
    /// # use std::path::Path;
    /// # fn example(client: SmartsheetClient) -> SmartsheetResult<()> {
    /// let attachment = client.attachments().attach_file_to_sheet(
    ///     4583173393803140,
    ///     Path::new("reports/q1.pdf"),
    ///     "application/pdf",
    /// )?;
    /// println!("Uploaded {:?}", attachment.name);
    /// # Ok(())
    /// # }
    /// ```
    pub fn attach_file_to_sheet(
        &self,
        sheet_id: i64,
        file: &Path,
        content_type: &str,
    ) -> SmartsheetResult<Attachment> {
        self.attach_file(&format!("sheets/{}/attachments", sheet_id), file, content_type)
    }

    /// Uploads a file from disk to a row.
    pub fn attach_file_to_row(
        &self,
        sheet_id: i64,
        row_id: i64,
        file: &Path,
        content_type: &str,
    ) -> SmartsheetResult<Attachment> {
        self.attach_file(
            &format!("sheets/{}/rows/{}/attachments", sheet_id, row_id),
            file,
            content_type,
        )
    }

    /// Uploads `length` bytes from a reader to a sheet.
    ///
    /// The reader must produce exactly `length` bytes; otherwise the upload
    /// fails with [`SmartsheetError::LengthMismatch`]. The request is not
    /// retried.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use integrations_smartsheet::*;
    /// # fn example(client: SmartsheetClient) -> SmartsheetResult<()> {
    /// let csv = b"task,owner\nwrite docs,kim\n".to_vec();
    /// let length = csv.len() as u64;
    /// client.attachments().attach_stream_to_sheet(
    ///     4583173393803140,
    ///     std::io::Cursor::new(csv),
    ///     length,
    ///     "owners.csv",
    ///     "text/csv",
    /// )?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn attach_stream_to_sheet<R>(
        &self,
        sheet_id: i64,
        reader: R,
        length: u64,
        filename: &str,
        content_type: &str,
    ) -> SmartsheetResult<Attachment>
    where
        R: Read + Send + 'static,
    {
        self.attach_stream(
            &format!("sheets/{}/attachments", sheet_id),
            reader,
            length,
            filename,
            content_type,
        )
    }

    /// Uploads `length` bytes from a reader to a row.
    pub fn attach_stream_to_row<R>(
        &self,
        sheet_id: i64,
        row_id: i64,
        reader: R,
        length: u64,
        filename: &str,
        content_type: &str,
    ) -> SmartsheetResult<Attachment>
    where
        R: Read + Send + 'static,
    {
        self.attach_stream(
            &format!("sheets/{}/rows/{}/attachments", sheet_id, row_id),
            reader,
            length,
            filename,
            content_type,
        )
    }

    /// Attaches a URL to a sheet.
    pub fn attach_url_to_sheet(&self, sheet_id: i64, link: &Attachment) -> SmartsheetResult<Attachment> {
        if link.url.as_deref().map_or(true, str::is_empty) {
            return Err(SmartsheetError::configuration("attachment URL is required"));
        }
        if link.attachment_type == Some(AttachmentType::File) {
            return Err(SmartsheetError::configuration(
                "file attachments are uploaded, not linked",
            ));
        }

        self.executor
            .create(&format!("sheets/{}/attachments", sheet_id), link)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn attach_file(&self, path: &str, file: &Path, content_type: &str) -> SmartsheetResult<Attachment> {
        let content_type = parse_content_type(content_type)?;
        let filename = file
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                SmartsheetError::configuration(format!(
                    "cannot derive an attachment name from {}",
                    file.display()
                ))
            })?;

        debug!(path = %path, file = %file.display(), "Uploading file attachment");
        self.executor
            .attach_file(path, file, content_type.as_ref(), filename)
    }

    fn attach_stream<R>(
        &self,
        path: &str,
        reader: R,
        length: u64,
        filename: &str,
        content_type: &str,
    ) -> SmartsheetResult<Attachment>
    where
        R: Read + Send + 'static,
    {
        if filename.is_empty() {
            return Err(SmartsheetError::configuration("attachment file name is required"));
        }
        let content_type = parse_content_type(content_type)?;

        debug!(path = %path, length, "Uploading stream attachment");
        self.executor
            .attach_stream(path, reader, content_type.as_ref(), length, filename)
    }
}

fn parse_content_type(content_type: &str) -> SmartsheetResult<Mime> {
    content_type.parse::<Mime>().map_err(|e| {
        SmartsheetError::Configuration(ConfigurationError::InvalidHeader(format!(
            "invalid content type '{}': {}",
            content_type, e
        )))
    })
}
