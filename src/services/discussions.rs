//! Discussions service for the Smartsheet API.

use crate::client::{with_query, RequestExecutor};
use crate::errors::{SmartsheetError, SmartsheetResult};
use crate::pagination::PaginationParams;
use crate::serialization::PagedResult;
use crate::types::{Comment, Discussion};
use std::sync::Arc;

/// Service for sheet discussions and their comments.
pub struct DiscussionsService {
    executor: Arc<RequestExecutor>,
}

impl DiscussionsService {
    /// Creates a new discussions service.
    pub(crate) fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Lists the discussions on a sheet.
    pub fn list(
        &self,
        sheet_id: i64,
        params: PaginationParams,
    ) -> SmartsheetResult<PagedResult<Discussion>> {
        let path = with_query(&format!("sheets/{}/discussions", sheet_id), &params)?;
        self.executor.list_paged(&path)
    }

    /// Gets a discussion with its comments.
    pub fn get(&self, sheet_id: i64, discussion_id: i64) -> SmartsheetResult<Discussion> {
        self.executor
            .fetch(&format!("sheets/{}/discussions/{}", sheet_id, discussion_id))
    }

    /// Starts a discussion on a sheet.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use integrations_smartsheet::*;
    /// # use integrations_smartsheet::types::Discussion;
    /// # fn example(client: SmartsheetClient) -> SmartsheetResult<()> {
    /// let discussion = client
    ///     .discussions()
    ///     .create(4583173393803140, &Discussion::new("Who owns row 4?"))?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn create(&self, sheet_id: i64, discussion: &Discussion) -> SmartsheetResult<Discussion> {
        let has_text = discussion
            .comment
            .as_ref()
            .and_then(|c| c.text.as_deref())
            .is_some_and(|t| !t.is_empty());
        if !has_text {
            return Err(SmartsheetError::configuration(
                "a discussion starts with a comment",
            ));
        }

        self.executor
            .create(&format!("sheets/{}/discussions", sheet_id), discussion)
    }

    /// Adds a comment to a discussion.
    pub fn add_comment(
        &self,
        sheet_id: i64,
        discussion_id: i64,
        comment: &Comment,
    ) -> SmartsheetResult<Comment> {
        if comment.text.as_deref().map_or(true, str::is_empty) {
            return Err(SmartsheetError::configuration("comment text is required"));
        }

        self.executor.create(
            &format!("sheets/{}/discussions/{}/comments", sheet_id, discussion_id),
            comment,
        )
    }

    /// Deletes a discussion and its comments.
    pub fn delete(&self, sheet_id: i64, discussion_id: i64) -> SmartsheetResult<()> {
        self.executor
            .remove(&format!("sheets/{}/discussions/{}", sheet_id, discussion_id))
    }
}
