//! Smartsheet API client implementation.

use crate::auth::{CredentialStore, Credentials};
use crate::config::{PoolConfig, SmartsheetConfig, SmartsheetConfigBuilder};
use crate::errors::{SmartsheetError, SmartsheetResult};
use crate::resilience::{BackoffPolicy, RetryConfig, RetryHook};
use crate::services::*;
use crate::transport::{HttpTransport, ReqwestTransport};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

mod executor;
pub use executor::{with_query, RequestExecutor, ASSUME_USER_HEADER, CHANGE_AGENT_HEADER};

/// Smartsheet API client.
///
/// This is the main entry point for interacting with the Smartsheet API.
/// Every service shares one request executor, one transport and one
/// credential store, so a token or assumed user set on the client applies to
/// the next request made through any service.
///
/// The client is `Send + Sync`; share it between threads behind an [`Arc`].
pub struct SmartsheetClient {
    /// Configuration.
    config: SmartsheetConfig,
    /// Credentials read by every request.
    credentials: Arc<CredentialStore>,
    /// Request executor (handles retry, headers, decoding).
    executor: Arc<RequestExecutor>,

    sheets: SheetsService,
    rows: RowsService,
    columns: ColumnsService,
    attachments: AttachmentsService,
    discussions: DiscussionsService,
    shares: SharesService,
    webhooks: WebhooksService,
    users: UsersService,
    server_info: ServerInfoService,
}

impl SmartsheetClient {
    /// Creates a new Smartsheet client with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration for the client
    ///
    /// # Returns
    ///
    /// A new client instance or an error if the configuration is invalid or
    /// the HTTP client cannot be built
    ///
    /// # Example
    ///
    /// ```no_run
    /// use integrations_smartsheet::{SmartsheetClient, SmartsheetConfig};
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = SmartsheetConfig::builder()
    ///     .access_token("ll352u9jujauoqz4gstvsae05")
    ///     .build()?;
    ///
    /// let client = SmartsheetClient::new(config)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: SmartsheetConfig) -> SmartsheetResult<Self> {
        config.validate()?;

        let transport = ReqwestTransport::from_config(&config).map_err(|e| {
            SmartsheetError::configuration(format!("Failed to create transport: {}", e))
        })?;

        Self::with_transport(config, Arc::new(transport))
    }

    /// Creates a client over a caller-supplied transport.
    pub fn with_transport(
        config: SmartsheetConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> SmartsheetResult<Self> {
        config.validate()?;

        let mut credentials = Credentials::new(config.access_token.clone());
        if let Some(user) = &config.assumed_user {
            credentials = credentials.with_assumed_user(user.clone());
        }
        if let Some(agent) = &config.change_agent {
            credentials = credentials.with_change_agent(agent.clone());
        }
        let credentials = Arc::new(CredentialStore::from_credentials(credentials));

        let executor = Arc::new(RequestExecutor::new(&config, transport, credentials.clone()));

        debug!(base_url = %config.base_url, "Created Smartsheet client");

        Ok(Self {
            sheets: SheetsService::new(executor.clone()),
            rows: RowsService::new(executor.clone()),
            columns: ColumnsService::new(executor.clone()),
            attachments: AttachmentsService::new(executor.clone()),
            discussions: DiscussionsService::new(executor.clone()),
            shares: SharesService::new(executor.clone()),
            webhooks: WebhooksService::new(executor.clone()),
            users: UsersService::new(executor.clone()),
            server_info: ServerInfoService::new(executor.clone()),
            config,
            credentials,
            executor,
        })
    }

    /// Creates a new client builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use integrations_smartsheet::SmartsheetClient;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = SmartsheetClient::builder()
    ///     .access_token("ll352u9jujauoqz4gstvsae05")
    ///     .change_agent("inventory-sync")
    ///     .timeout(std::time::Duration::from_secs(30))
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder() -> SmartsheetClientBuilder {
        SmartsheetClientBuilder::new()
    }

    // Service accessors

    /// Access the sheets service.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use integrations_smartsheet::*;
    /// # fn example(client: SmartsheetClient) -> SmartsheetResult<()> {
    /// let sheets = client.sheets().list_all(Some(100))?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn sheets(&self) -> &SheetsService {
        &self.sheets
    }

    /// Access the rows service.
    pub fn rows(&self) -> &RowsService {
        &self.rows
    }

    /// Access the columns service.
    pub fn columns(&self) -> &ColumnsService {
        &self.columns
    }

    /// Access the attachments service.
    pub fn attachments(&self) -> &AttachmentsService {
        &self.attachments
    }

    /// Access the discussions service.
    pub fn discussions(&self) -> &DiscussionsService {
        &self.discussions
    }

    /// Access the sheet sharing service.
    pub fn shares(&self) -> &SharesService {
        &self.shares
    }

    /// Access the webhooks service.
    pub fn webhooks(&self) -> &WebhooksService {
        &self.webhooks
    }

    /// Access the users service.
    pub fn users(&self) -> &UsersService {
        &self.users
    }

    /// Access the server info service.
    pub fn server_info(&self) -> &ServerInfoService {
        &self.server_info
    }

    // Credentials

    /// Replaces the bearer token. Requests that already started keep the
    /// token they were sent with.
    pub fn set_access_token(&self, token: impl Into<String>) {
        self.credentials.set_access_token(token);
    }

    /// Acts on behalf of another user from the next request on.
    pub fn set_assumed_user(&self, email: impl Into<String>) {
        self.credentials.set_assumed_user(email);
    }

    /// Stops acting on behalf of another user.
    pub fn clear_assumed_user(&self) {
        self.credentials.clear_assumed_user();
    }

    /// Sets or clears the change agent.
    pub fn set_change_agent(&self, agent: Option<String>) {
        self.credentials.set_change_agent(agent);
    }

    /// Returns the credentials the next request will use.
    pub fn credentials(&self) -> Arc<Credentials> {
        self.credentials.snapshot()
    }

    /// Closes the transport. Later requests fail with a network error.
    pub fn close(&self) {
        debug!("Closing Smartsheet client");
        self.executor.transport().close();
    }

    /// Gets the base URL for the API.
    pub fn base_url(&self) -> &str {
        self.config.base_url.as_str()
    }

    /// Gets the configuration.
    pub fn config(&self) -> &SmartsheetConfig {
        &self.config
    }

    /// Gets the request executor (for endpoints without a service).
    pub fn executor(&self) -> &Arc<RequestExecutor> {
        &self.executor
    }
}

impl std::fmt::Debug for SmartsheetClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmartsheetClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Builder for SmartsheetClient.
///
/// Provides a fluent API for constructing a client with custom configuration.
pub struct SmartsheetClientBuilder {
    config_builder: SmartsheetConfigBuilder,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl SmartsheetClientBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            config_builder: SmartsheetConfig::builder(),
            transport: None,
        }
    }

    /// Sets the access token. Falls back to `SMARTSHEET_ACCESS_TOKEN`.
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.access_token(token);
        self
    }

    /// Sets the user to act on behalf of.
    pub fn assumed_user(mut self, email: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.assumed_user(email);
        self
    }

    /// Sets the change agent.
    pub fn change_agent(mut self, agent: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.change_agent(agent);
        self
    }

    /// Sets the base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.base_url(url);
        self
    }

    /// Sets the timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config_builder = self.config_builder.timeout(timeout);
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config_builder = self.config_builder.connect_timeout(timeout);
        self
    }

    /// Sets the connection pool limits.
    pub fn pool(mut self, pool: PoolConfig) -> Self {
        self.config_builder = self.config_builder.pool(pool);
        self
    }

    /// Routes every request through a proxy.
    pub fn proxy(mut self, url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.proxy(url);
        self
    }

    /// Sets the retry settings.
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.config_builder = self.config_builder.retry(retry);
        self
    }

    /// Replaces the backoff policy.
    pub fn backoff_policy(mut self, policy: Arc<dyn BackoffPolicy>) -> Self {
        self.config_builder = self.config_builder.backoff_policy(policy);
        self
    }

    /// Installs a retry observer.
    pub fn retry_hook(mut self, hook: Arc<dyn RetryHook>) -> Self {
        self.config_builder = self.config_builder.retry_hook(hook);
        self
    }

    /// Sets the user agent.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.user_agent(ua);
        self
    }

    /// Rejects response fields the target types do not know.
    pub fn strict_decoding(mut self, strict: bool) -> Self {
        self.config_builder = self.config_builder.strict_decoding(strict);
        self
    }

    /// Sets the buffer size for raw downloads.
    pub fn download_buffer_size(mut self, size: usize) -> Self {
        self.config_builder = self.config_builder.download_buffer_size(size);
        self
    }

    /// Logs JSON bodies at `trace` level.
    pub fn log_bodies(mut self, enabled: bool) -> Self {
        self.config_builder = self.config_builder.log_bodies(enabled);
        self
    }

    /// Uses a custom transport instead of reqwest.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Builds the client.
    pub fn build(self) -> SmartsheetResult<SmartsheetClient> {
        let config = self.config_builder.build()?;
        match self.transport {
            Some(transport) => SmartsheetClient::with_transport(config, transport),
            None => SmartsheetClient::new(config),
        }
    }
}

impl Default for SmartsheetClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
