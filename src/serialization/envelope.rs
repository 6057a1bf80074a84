//! Response envelopes.

use crate::errors::ErrorBody;
use serde::{Deserialize, Serialize};

/// `resultCode` of a fully successful mutation.
pub const RESULT_CODE_SUCCESS: i32 = 0;

/// `resultCode` of a bulk mutation where some items failed.
pub const RESULT_CODE_PARTIAL_SUCCESS: i32 = 3;

/// The envelope a caller expects around a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeShape {
    /// A bare object.
    Single,
    /// A bare array.
    List,
    /// `{pageNumber, pageSize, totalPages, totalCount, data}`.
    Paged,
    /// `{message, resultCode, result, version}`.
    Result,
    /// A result envelope carrying `failedItems`.
    Bulk,
}

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    /// A bare object.
    Single(T),
    /// A bare array.
    List(Vec<T>),
    /// One page of a paged listing.
    Paged(PagedResult<T>),
    /// A mutation result.
    Result(ApiResult<T>),
    /// A bulk mutation result.
    Bulk(BulkItemResult<T>),
}

impl<T> Envelope<T> {
    /// Returns the shape this envelope was decoded as.
    pub fn shape(&self) -> EnvelopeShape {
        match self {
            Envelope::Single(_) => EnvelopeShape::Single,
            Envelope::List(_) => EnvelopeShape::List,
            Envelope::Paged(_) => EnvelopeShape::Paged,
            Envelope::Result(_) => EnvelopeShape::Result,
            Envelope::Bulk(_) => EnvelopeShape::Bulk,
        }
    }

    /// Flattens the envelope into the items it carries.
    pub fn into_list(self) -> Vec<T> {
        match self {
            Envelope::Single(item) => vec![item],
            Envelope::List(items) => items,
            Envelope::Paged(page) => page.data,
            Envelope::Result(result) => result.result.into_iter().collect(),
            Envelope::Bulk(bulk) => bulk.result,
        }
    }
}

/// One page of a paged listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    /// Current page number, starting at 1.
    #[serde(default = "first_page")]
    pub page_number: u32,
    /// Items per page. Absent when all items were requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of items across all pages.
    #[serde(default)]
    pub total_count: u64,
    /// Items on this page.
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

fn first_page() -> u32 {
    1
}

impl<T> PagedResult<T> {
    /// Returns true if a later page exists.
    pub fn has_next_page(&self) -> bool {
        self.page_number < self.total_pages
    }
}

/// Result envelope returned by create, update and delete calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResult<T> {
    /// Status message, `SUCCESS` on success.
    #[serde(default)]
    pub message: String,
    /// Result code, [`RESULT_CODE_SUCCESS`] on success.
    #[serde(default)]
    pub result_code: i32,
    /// The created or updated object.
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    /// New version of the containing sheet, if it changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

/// Result of a bulk mutation that allows partial success.
///
/// Items that failed are reported in `failed_items` alongside the items that
/// were applied; a partial failure is not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkItemResult<T> {
    /// Status message.
    #[serde(default)]
    pub message: String,
    /// [`RESULT_CODE_PARTIAL_SUCCESS`] when some items failed.
    #[serde(default)]
    pub result_code: i32,
    /// Items that were applied.
    #[serde(default = "Vec::new")]
    pub result: Vec<T>,
    /// New version of the containing sheet, if it changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    /// Items that were rejected.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_items: Vec<BulkItemFailure>,
}

impl<T> BulkItemResult<T> {
    /// Returns true if at least one item failed.
    pub fn is_partial_success(&self) -> bool {
        self.result_code == RESULT_CODE_PARTIAL_SUCCESS || !self.failed_items.is_empty()
    }
}

/// One rejected item of a bulk mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkItemFailure {
    /// Position of the item in the request.
    pub index: usize,
    /// Why the item was rejected.
    pub error: ErrorBody,
    /// Row the item referred to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_id: Option<i64>,
}
