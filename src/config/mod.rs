//! Configuration for the Smartsheet client.

use crate::errors::{ConfigurationError, SmartsheetError, SmartsheetResult};
use crate::resilience::{BackoffPolicy, RetryConfig, RetryHook};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.smartsheet.com/2.0/";

/// Environment variable consulted when no access token is configured.
pub const ACCESS_TOKEN_ENV: &str = "SMARTSHEET_ACCESS_TOKEN";

/// Default buffer size for raw downloads.
pub const DEFAULT_DOWNLOAD_BUFFER_SIZE: usize = 8 * 1024;

/// Configuration for the Smartsheet client.
#[derive(Clone)]
pub struct SmartsheetConfig {
    /// Base URL for the API. Always ends with `/`.
    pub base_url: Url,

    /// Initial bearer token.
    pub access_token: String,

    /// User to act on behalf of, sent as `Assume-User`.
    pub assumed_user: Option<String>,

    /// Application identifier sent as `Smartsheet-Change-Agent`.
    pub change_agent: Option<String>,

    /// User agent string.
    pub user_agent: String,

    /// Default timeout for requests.
    pub timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Pool configuration.
    pub pool: PoolConfig,

    /// Proxy URL for all requests.
    pub proxy: Option<Url>,

    /// Retry settings.
    pub retry: RetryConfig,

    /// Replaces the exponential policy built from `retry`.
    pub backoff_policy: Option<Arc<dyn BackoffPolicy>>,

    /// Observer called before each retry wait.
    pub retry_hook: Option<Arc<dyn RetryHook>>,

    /// Reject response fields the target type does not know.
    pub strict_decoding: bool,

    /// Buffer size used when copying raw response bodies.
    pub download_buffer_size: usize,

    /// Emit JSON request and response bodies at `trace` level.
    pub log_bodies: bool,
}

/// Connection pool configuration.
#[derive(Clone, Debug)]
pub struct PoolConfig {
    /// Maximum idle connections per host.
    pub max_idle_per_host: usize,

    /// Idle timeout.
    pub idle_timeout: Option<Duration>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_idle_per_host: 10,
            idle_timeout: Some(Duration::from_secs(90)),
        }
    }
}

impl SmartsheetConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> SmartsheetConfigBuilder {
        SmartsheetConfigBuilder::new()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> SmartsheetResult<()> {
        if self.access_token.trim().is_empty() {
            return Err(ConfigurationError::MissingAccessToken(
                "Access token must not be empty".to_string(),
            )
            .into());
        }

        if !matches!(self.base_url.scheme(), "http" | "https") {
            return Err(ConfigurationError::InvalidBaseUrl(format!(
                "Base URL must use http or https: {}",
                self.base_url
            ))
            .into());
        }

        if self.download_buffer_size == 0 {
            return Err(SmartsheetError::configuration(
                "Download buffer size must be positive",
            ));
        }

        if self.retry.multiplier.is_nan() || self.retry.multiplier < 1.0 {
            return Err(SmartsheetError::configuration(
                "Retry multiplier must be at least 1.0",
            ));
        }

        if !(0.0..=1.0).contains(&self.retry.jitter) {
            return Err(SmartsheetError::configuration(
                "Retry jitter must be between 0.0 and 1.0",
            ));
        }

        if self.retry.max_attempts == Some(0) {
            return Err(SmartsheetError::configuration(
                "Retry max attempts must be at least 1",
            ));
        }

        Ok(())
    }
}

impl fmt::Debug for SmartsheetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmartsheetConfig")
            .field("base_url", &self.base_url.as_str())
            .field("access_token", &"[REDACTED]")
            .field("assumed_user", &self.assumed_user)
            .field("change_agent", &self.change_agent)
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("pool", &self.pool)
            .field("proxy", &self.proxy.as_ref().map(Url::as_str))
            .field("retry", &self.retry)
            .field("strict_decoding", &self.strict_decoding)
            .field("download_buffer_size", &self.download_buffer_size)
            .field("log_bodies", &self.log_bodies)
            .finish_non_exhaustive()
    }
}

/// Builder for SmartsheetConfig.
pub struct SmartsheetConfigBuilder {
    base_url: Option<String>,
    access_token: Option<String>,
    assumed_user: Option<String>,
    change_agent: Option<String>,
    user_agent: Option<String>,
    timeout: Duration,
    connect_timeout: Duration,
    pool: PoolConfig,
    proxy: Option<String>,
    retry: RetryConfig,
    backoff_policy: Option<Arc<dyn BackoffPolicy>>,
    retry_hook: Option<Arc<dyn RetryHook>>,
    strict_decoding: bool,
    download_buffer_size: usize,
    log_bodies: bool,
}

impl SmartsheetConfigBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            base_url: None,
            access_token: None,
            assumed_user: None,
            change_agent: None,
            user_agent: None,
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(30),
            pool: PoolConfig::default(),
            proxy: None,
            retry: RetryConfig::default(),
            backoff_policy: None,
            retry_hook: None,
            strict_decoding: false,
            download_buffer_size: DEFAULT_DOWNLOAD_BUFFER_SIZE,
            log_bodies: false,
        }
    }

    /// Sets the base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the access token.
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Sets the user to act on behalf of.
    pub fn assumed_user(mut self, email: impl Into<String>) -> Self {
        self.assumed_user = Some(email.into());
        self
    }

    /// Sets the change agent.
    pub fn change_agent(mut self, agent: impl Into<String>) -> Self {
        self.change_agent = Some(agent.into());
        self
    }

    /// Sets the user agent string.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the pool configuration.
    pub fn pool(mut self, pool: PoolConfig) -> Self {
        self.pool = pool;
        self
    }

    /// Routes all requests through a proxy.
    pub fn proxy(mut self, url: impl Into<String>) -> Self {
        self.proxy = Some(url.into());
        self
    }

    /// Sets the retry settings.
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Replaces the default exponential backoff.
    pub fn backoff_policy(mut self, policy: Arc<dyn BackoffPolicy>) -> Self {
        self.backoff_policy = Some(policy);
        self
    }

    /// Sets an observer called before each retry wait.
    pub fn retry_hook(mut self, hook: Arc<dyn RetryHook>) -> Self {
        self.retry_hook = Some(hook);
        self
    }

    /// Rejects response fields the target type does not know.
    pub fn strict_decoding(mut self, strict: bool) -> Self {
        self.strict_decoding = strict;
        self
    }

    /// Sets the buffer size for raw downloads.
    pub fn download_buffer_size(mut self, size: usize) -> Self {
        self.download_buffer_size = size;
        self
    }

    /// Logs JSON bodies at `trace` level.
    pub fn log_bodies(mut self, enabled: bool) -> Self {
        self.log_bodies = enabled;
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> SmartsheetResult<SmartsheetConfig> {
        let access_token = resolve_access_token(self.access_token, |name| {
            std::env::var(name).ok()
        })?;

        let base_url = parse_base_url(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;

        let proxy = match self.proxy {
            Some(proxy) => Some(Url::parse(&proxy).map_err(|e| {
                SmartsheetError::configuration(format!("Invalid proxy URL '{}': {}", proxy, e))
            })?),
            None => None,
        };

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("integrations-smartsheet/{}", env!("CARGO_PKG_VERSION")));

        let config = SmartsheetConfig {
            base_url,
            access_token,
            assumed_user: self.assumed_user,
            change_agent: self.change_agent,
            user_agent,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            pool: self.pool,
            proxy,
            retry: self.retry,
            backoff_policy: self.backoff_policy,
            retry_hook: self.retry_hook,
            strict_decoding: self.strict_decoding,
            download_buffer_size: self.download_buffer_size,
            log_bodies: self.log_bodies,
        };

        config.validate()?;

        Ok(config)
    }
}

impl Default for SmartsheetConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve_access_token<F>(explicit: Option<String>, lookup: F) -> SmartsheetResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    explicit
        .or_else(|| lookup(ACCESS_TOKEN_ENV))
        .ok_or_else(|| {
            ConfigurationError::MissingAccessToken(format!(
                "No access token configured and {} is not set",
                ACCESS_TOKEN_ENV
            ))
            .into()
        })
}

/// Parses a base URL so that relative paths join beneath it.
fn parse_base_url(raw: &str) -> SmartsheetResult<Url> {
    let mut url = Url::parse(raw).map_err(|e| {
        SmartsheetError::Configuration(ConfigurationError::InvalidBaseUrl(format!(
            "{}: {}",
            raw, e
        )))
    })?;

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
