//! Users service for the Smartsheet API.

use crate::client::{with_query, RequestExecutor};
use crate::errors::SmartsheetResult;
use crate::pagination::PaginationParams;
use crate::serialization::PagedResult;
use crate::types::UserProfile;
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
struct UserQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(flatten)]
    page: PaginationParams,
}

/// Service for user operations.
pub struct UsersService {
    executor: Arc<RequestExecutor>,
}

impl UsersService {
    /// Creates a new users service.
    pub(crate) fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Gets the profile of the caller, or of the assumed user.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use integrations_smartsheet::*;
    /// # fn example(client: SmartsheetClient) -> SmartsheetResult<()> {
    /// let me = client.users().me()?;
    /// println!("Signed in as {:?}", me.email);
    /// # Ok(())
    /// # }
    /// ```
    pub fn me(&self) -> SmartsheetResult<UserProfile> {
        self.executor.fetch("users/me")
    }

    /// Lists users in the organization, optionally filtered by email.
    pub fn list(
        &self,
        email: Option<&str>,
        params: PaginationParams,
    ) -> SmartsheetResult<PagedResult<UserProfile>> {
        let path = with_query("users", &UserQuery { email, page: params })?;
        self.executor.list_paged(&path)
    }
}
