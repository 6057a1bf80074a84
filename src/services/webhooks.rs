//! Webhooks service for the Smartsheet API.

use crate::client::{with_query, RequestExecutor};
use crate::errors::{SmartsheetError, SmartsheetResult};
use crate::pagination::PaginationParams;
use crate::serialization::PagedResult;
use crate::types::Webhook;
use std::sync::Arc;
use url::Url;

/// Service for webhook operations.
pub struct WebhooksService {
    executor: Arc<RequestExecutor>,
}

impl WebhooksService {
    /// Creates a new webhooks service.
    pub(crate) fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Lists the webhooks owned by the caller.
    pub fn list(&self, params: PaginationParams) -> SmartsheetResult<PagedResult<Webhook>> {
        let path = with_query("webhooks", &params)?;
        self.executor.list_paged(&path)
    }

    /// Gets a webhook.
    pub fn get(&self, webhook_id: i64) -> SmartsheetResult<Webhook> {
        self.executor.fetch(&format!("webhooks/{}", webhook_id))
    }

    /// Creates a webhook. New webhooks start disabled until enabled with
    /// [`update`](Self::update).
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use integrations_smartsheet::*;
    /// # use integrations_smartsheet::types::Webhook;
    /// # fn example(client: SmartsheetClient) -> SmartsheetResult<()> {
    /// let hook = Webhook::for_sheet("sync", "https://hooks.example.com/smartsheet", 4583173393803140);
    /// let created = client.webhooks().create(&hook)?;
    /// println!("Webhook {:?} is {:?}", created.id, created.status);
    /// # Ok(())
    /// # }
    /// ```
    pub fn create(&self, webhook: &Webhook) -> SmartsheetResult<Webhook> {
        if webhook.name.as_deref().map_or(true, str::is_empty) {
            return Err(SmartsheetError::configuration("webhook name is required"));
        }
        let callback = webhook
            .callback_url
            .as_deref()
            .ok_or_else(|| SmartsheetError::configuration("webhook callback URL is required"))?;
        let callback = Url::parse(callback).map_err(|e| {
            SmartsheetError::configuration(format!("invalid callback URL '{}': {}", callback, e))
        })?;
        if callback.scheme() != "https" {
            return Err(SmartsheetError::configuration(
                "webhook callback URL must use https",
            ));
        }

        self.executor.create("webhooks", webhook)
    }

    /// Updates a webhook, e.g. to enable it.
    pub fn update(&self, webhook_id: i64, webhook: &Webhook) -> SmartsheetResult<Webhook> {
        self.executor
            .update(&format!("webhooks/{}", webhook_id), webhook)
    }

    /// Deletes a webhook.
    pub fn delete(&self, webhook_id: i64) -> SmartsheetResult<()> {
        self.executor.remove(&format!("webhooks/{}", webhook_id))
    }
}
