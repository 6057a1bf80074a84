//! Smartsheet Integration Module
//!
//! This module provides a type-safe, blocking client for the Smartsheet REST
//! API 2.0. Requests are authenticated with a bearer access token and can act
//! on behalf of another user through `Assume-User`.
//!
//! # Features
//!
//! - **Sheets**: List, get, create, update, delete and export (PDF, Excel, CSV)
//! - **Rows and Columns**: Bulk add, update and delete, with partial success
//! - **Attachments**: Upload files and streams, attach URLs
//! - **Discussions, Shares, Webhooks, Users**: Common collaboration endpoints
//! - **Error Classification**: Every non-200 response becomes a typed error
//!   carrying the service's `errorCode`, `message` and `refId`
//! - **Resilience**: Exponential backoff with jitter for transient failures,
//!   bounded by an elapsed-time ceiling
//! - **Length Enforcement**: Uploads fail when a stream produces more or fewer
//!   bytes than declared
//!
//! # Example
//!
//! ```no_run
//! use integrations_smartsheet::{SmartsheetClient, SmartsheetConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Reads SMARTSHEET_ACCESS_TOKEN when no token is set explicitly
//! let config = SmartsheetConfig::builder().build()?;
//! let client = SmartsheetClient::new(config)?;
//!
//! // List sheets
//! let page = client.sheets().list(Default::default())?;
//! for sheet in page.data {
//!     println!("{:?}: {:?}", sheet.id, sheet.name);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

// Core modules
pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod pagination;
pub mod resilience;
pub mod serialization;
pub mod services;
pub mod transport;
pub mod types;

// Internal modules (not part of public API)
#[cfg(test)]
mod mocks;

// Re-exports for convenience
pub use auth::{CredentialStore, Credentials};
pub use client::{RequestExecutor, SmartsheetClient, SmartsheetClientBuilder};
pub use config::{SmartsheetConfig, SmartsheetConfigBuilder};
pub use errors::{ApiError, ErrorKind, SmartsheetError, SmartsheetResult};
pub use pagination::{PageIterator, PaginationParams};
pub use resilience::{Backoff, BackoffPolicy, RetryConfig, RetryContext, RetryHook};
pub use serialization::{BulkItemResult, PagedResult};

/// Prelude module with commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits from the library,
/// making it convenient to use with a single import:
///
/// ```no_run
/// use integrations_smartsheet::prelude::*;
/// ```
pub mod prelude {
    // Client
    pub use crate::client::{SmartsheetClient, SmartsheetClientBuilder};

    // Configuration
    pub use crate::config::{SmartsheetConfig, SmartsheetConfigBuilder};

    // Services
    pub use crate::services::{
        AttachmentsService, ColumnsService, DiscussionsService, RowsService, ServerInfoService,
        SharesService, SheetsService, UsersService, WebhooksService,
    };

    // Common types
    pub use crate::types::{
        AccessLevel, Attachment, AttachmentType, Cell, Column, ColumnType, Comment, Discussion,
        ExportParams, PaperSize, Row, Share, Sheet, SheetExportFormat, UserProfile, Webhook,
    };

    // Envelopes
    pub use crate::serialization::{ApiResult, BulkItemFailure, BulkItemResult, PagedResult};

    // Errors
    pub use crate::errors::{ErrorKind, SmartsheetError, SmartsheetResult};

    // Pagination
    pub use crate::pagination::{PageIterator, PaginationParams};

    // Resilience
    pub use crate::resilience::{RetryConfig, RetryHook};
}
