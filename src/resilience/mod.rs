//! Retry and backoff for transient Smartsheet failures.
//!
//! Retries are caller-driven: [`RetryExecutor::execute`] runs the operation on
//! the calling thread and blocks between attempts. How long to wait is decided
//! by a pluggable [`BackoffPolicy`]; the executor additionally enforces a
//! ceiling on total elapsed time whatever the policy returns.

use crate::errors::{SmartsheetError, SmartsheetResult};
use rand::Rng;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Retry configuration for exponential backoff.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first. `None` leaves the
    /// elapsed-time ceiling as the only bound.
    pub max_attempts: Option<u32>,
    /// Initial backoff duration.
    pub initial_backoff: Duration,
    /// Maximum duration of a single wait.
    pub max_backoff: Duration,
    /// Multiplier for exponential backoff.
    pub multiplier: f64,
    /// Random extra wait, as a fraction of the computed delay (0.0 to 1.0).
    pub jitter: f64,
    /// Ceiling on total elapsed time across all attempts of one call.
    pub max_elapsed: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: None,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(30),
            multiplier: 2.0,
            jitter: 0.1,
            max_elapsed: Duration::from_secs(15),
        }
    }
}

impl RetryConfig {
    /// A configuration that never retries.
    pub fn disabled() -> Self {
        Self {
            max_attempts: Some(1),
            ..Self::default()
        }
    }
}

/// Outcome of a backoff decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Wait this long, then retry.
    Wait(Duration),
    /// Give up.
    Stop,
}

/// Decides how long to wait before the next attempt.
pub trait BackoffPolicy: Send + Sync {
    /// Computes the wait after a failed attempt.
    ///
    /// `previous_attempts` counts the attempts made before the one that just
    /// failed, so it is 0 after the first failure.
    fn next_backoff(
        &self,
        previous_attempts: u32,
        total_elapsed: Duration,
        last_error: &SmartsheetError,
    ) -> Backoff;
}

/// Default policy: `initial * multiplier^previous_attempts`, capped, plus
/// jitter. A longer `Retry-After` hint from the server wins.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    initial_backoff: Duration,
    max_backoff: Duration,
    multiplier: f64,
    jitter: f64,
    max_attempts: Option<u32>,
}

impl ExponentialBackoff {
    /// Creates the policy from retry settings.
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            initial_backoff: config.initial_backoff,
            max_backoff: config.max_backoff,
            multiplier: config.multiplier,
            jitter: config.jitter,
            max_attempts: config.max_attempts,
        }
    }

    /// Returns the capped delay before jitter.
    pub fn base_delay(&self, previous_attempts: u32) -> Duration {
        let exponent = previous_attempts.min(i32::MAX as u32) as i32;
        let delay = self.initial_backoff.as_secs_f64() * self.multiplier.powi(exponent);
        let capped = delay.min(self.max_backoff.as_secs_f64());
        if !capped.is_finite() {
            self.max_backoff
        } else if capped <= 0.0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(capped)
        }
    }
}

impl BackoffPolicy for ExponentialBackoff {
    fn next_backoff(
        &self,
        previous_attempts: u32,
        _total_elapsed: Duration,
        last_error: &SmartsheetError,
    ) -> Backoff {
        if let Some(max) = self.max_attempts {
            if previous_attempts.saturating_add(1) >= max {
                return Backoff::Stop;
            }
        }

        let mut delay = self.base_delay(previous_attempts);
        let extra = (delay.as_secs_f64() * self.jitter).min(self.max_backoff.as_secs_f64());
        if extra.is_finite() && extra > 0.0 {
            let extra = rand::thread_rng().gen_range(0.0..=extra);
            delay = delay
                .saturating_add(Duration::from_secs_f64(extra))
                .min(self.max_backoff);
        }

        match last_error.retry_after() {
            Some(server_delay) if server_delay > delay => Backoff::Wait(server_delay),
            _ => Backoff::Wait(delay),
        }
    }
}

/// Observes retries. Hooks cannot change the decision.
pub trait RetryHook: Send + Sync {
    /// Called before each backoff wait.
    fn on_retry(&self, context: &RetryContext);
}

/// Context information for a retry.
#[derive(Debug, Clone)]
pub struct RetryContext {
    /// Name of the logical operation.
    pub operation: String,
    /// Number of the attempt that just failed, starting at 1.
    pub attempt: u32,
    /// The failure being retried.
    pub error: SmartsheetError,
    /// Wait before the next attempt.
    pub delay: Duration,
    /// Time since the first attempt started.
    pub elapsed: Duration,
}

/// Retry executor with a pluggable backoff policy.
#[derive(Clone)]
pub struct RetryExecutor {
    policy: Arc<dyn BackoffPolicy>,
    max_elapsed: Duration,
    hook: Option<Arc<dyn RetryHook>>,
}

impl RetryExecutor {
    /// Creates an executor using [`ExponentialBackoff`].
    pub fn new(config: RetryConfig) -> Self {
        Self {
            policy: Arc::new(ExponentialBackoff::from_config(&config)),
            max_elapsed: config.max_elapsed,
            hook: None,
        }
    }

    /// Replaces the backoff policy.
    pub fn with_policy(mut self, policy: Arc<dyn BackoffPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Adds a retry hook.
    pub fn with_hook(mut self, hook: Arc<dyn RetryHook>) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Ceiling on total elapsed time.
    pub fn max_elapsed(&self) -> Duration {
        self.max_elapsed
    }

    /// Executes an operation with retry logic.
    ///
    /// `f` receives the attempt number (starting at 1). Non-retryable errors
    /// are returned unchanged. A retryable error that outlives the policy or
    /// the elapsed-time ceiling is wrapped in
    /// [`SmartsheetError::RetryExhausted`].
    pub fn execute<T, F>(&self, operation: &str, mut f: F) -> SmartsheetResult<T>
    where
        F: FnMut(u32) -> SmartsheetResult<T>,
    {
        let started = Instant::now();
        let mut previous_attempts = 0u32;

        loop {
            let attempt = previous_attempts + 1;
            let error = match f(attempt) {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            if !error.is_retryable() {
                return Err(error);
            }

            let elapsed = started.elapsed();
            let decision = if elapsed >= self.max_elapsed {
                Backoff::Stop
            } else {
                self.policy.next_backoff(previous_attempts, elapsed, &error)
            };

            let delay = match decision {
                Backoff::Wait(delay) => delay.min(self.max_elapsed - elapsed),
                Backoff::Stop => {
                    info!(
                        operation = %operation,
                        attempts = attempt,
                        elapsed_ms = elapsed.as_millis() as u64,
                        error = %error,
                        "Retry budget exhausted"
                    );
                    return Err(SmartsheetError::RetryExhausted {
                        attempts: attempt,
                        elapsed,
                        last: Box::new(error),
                    });
                }
            };

            warn!(
                operation = %operation,
                attempt = attempt,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "Retrying after transient failure"
            );

            if let Some(hook) = &self.hook {
                hook.on_retry(&RetryContext {
                    operation: operation.to_string(),
                    attempt,
                    error,
                    delay,
                    elapsed,
                });
            }

            std::thread::sleep(delay);
            previous_attempts += 1;
        }
    }
}

impl Default for RetryExecutor {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}

impl std::fmt::Debug for RetryExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryExecutor")
            .field("max_elapsed", &self.max_elapsed)
            .field("hook", &self.hook.is_some())
            .finish_non_exhaustive()
    }
}
