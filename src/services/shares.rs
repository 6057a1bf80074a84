//! Sheet sharing service for the Smartsheet API.

use crate::client::{with_query, RequestExecutor};
use crate::errors::{SmartsheetError, SmartsheetResult};
use crate::pagination::PaginationParams;
use crate::serialization::PagedResult;
use crate::types::Share;
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ShareQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    send_email: Option<bool>,
}

/// Service for sheet shares.
pub struct SharesService {
    executor: Arc<RequestExecutor>,
}

impl SharesService {
    /// Creates a new shares service.
    pub(crate) fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Lists who a sheet is shared with.
    pub fn list(&self, sheet_id: i64, params: PaginationParams) -> SmartsheetResult<PagedResult<Share>> {
        let path = with_query(&format!("sheets/{}/shares", sheet_id), &params)?;
        self.executor.list_paged(&path)
    }

    /// Shares a sheet with users or groups.
    ///
    /// # Arguments
    ///
    /// * `sheet_id` - Sheet to share
    /// * `shares` - One entry per user or group
    /// * `send_email` - Whether to notify recipients; the service default
    ///   applies when `None`
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use integrations_smartsheet::*;
    /// # use integrations_smartsheet::types::{AccessLevel, Share};
    /// # fn example(client: SmartsheetClient) -> SmartsheetResult<()> {
    /// let shares = vec![Share::with_user("kim@example.com", AccessLevel::Editor)];
    /// client.shares().share(4583173393803140, &shares, Some(true))?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn share(
        &self,
        sheet_id: i64,
        shares: &[Share],
        send_email: Option<bool>,
    ) -> SmartsheetResult<Vec<Share>> {
        if shares.is_empty() {
            return Err(SmartsheetError::configuration("at least one share is required"));
        }
        if let Some(index) = shares
            .iter()
            .position(|s| s.access_level.is_none() || (s.email.is_none() && s.group_id.is_none()))
        {
            return Err(SmartsheetError::configuration(format!(
                "share at index {} needs an access level and an email or group",
                index
            )));
        }

        let path = with_query(
            &format!("sheets/{}/shares", sheet_id),
            &ShareQuery { send_email },
        )?;
        self.executor.post_for_list(&path, shares)
    }

    /// Changes the access level of a share.
    pub fn update(&self, sheet_id: i64, share_id: &str, share: &Share) -> SmartsheetResult<Share> {
        if share.access_level.is_none() {
            return Err(SmartsheetError::configuration("access level is required"));
        }

        self.executor
            .update(&format!("sheets/{}/shares/{}", sheet_id, share_id), share)
    }

    /// Removes a share.
    pub fn delete(&self, sheet_id: i64, share_id: &str) -> SmartsheetResult<()> {
        self.executor
            .remove(&format!("sheets/{}/shares/{}", sheet_id, share_id))
    }
}
