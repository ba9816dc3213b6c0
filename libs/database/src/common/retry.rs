use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Backoff policy for connection attempts at startup.
///
/// Repository operations never retry; this is only for establishing the
/// initial connection.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt
    pub max_retries: u32,

    /// Delay before the first retry in milliseconds
    pub initial_delay_ms: u64,

    /// Upper bound for any single delay in milliseconds
    pub max_delay_ms: u64,

    /// Multiplier applied to the delay after each failed attempt
    pub backoff_multiplier: f64,

    /// Scale each delay by a random factor in [0.5, 1.0]
    pub use_jitter: bool,
}

impl RetryConfig {
    /// Defaults: 3 retries, 100ms initial delay, 5s cap, x2 backoff, jitter on.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay_ms: u64) -> Self {
        self.initial_delay_ms = delay_ms;
        self
    }

    pub fn with_max_delay(mut self, delay_ms: u64) -> Self {
        self.max_delay_ms = delay_ms;
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.use_jitter = false;
        self
    }

    /// Un-jittered delay before retry number `retry` (1-based).
    pub fn delay_for(&self, retry: u32) -> u64 {
        let exponent = retry.saturating_sub(1) as i32;
        let delay = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(exponent);
        (delay as u64).min(self.max_delay_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 100,
            max_delay_ms: 5000,
            backoff_multiplier: 2.0,
            use_jitter: true,
        }
    }
}

/// Retry an async operation with exponential backoff while `should_retry`
/// accepts the error.
///
/// # Example
/// ```ignore
/// use database::common::retry::{retry_with_backoff_if, RetryConfig};
///
/// let client = retry_with_backoff_if(
///     || database::mongodb::connect_from_config(&config),
///     RetryConfig::new().with_max_retries(5),
///     |e| e.is_transient(),
/// )
/// .await?;
/// ```
pub async fn retry_with_backoff_if<F, Fut, T, E, P>(
    mut operation: F,
    config: RetryConfig,
    should_retry: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let mut retries = 0;

    loop {
        match operation().await {
            Ok(result) => {
                if retries > 0 {
                    debug!(retries, "Operation succeeded after retrying");
                }
                return Ok(result);
            }
            Err(e) if !should_retry(&e) => {
                warn!(error = %e, "Operation failed with a non-retryable error");
                return Err(e);
            }
            Err(e) => {
                retries += 1;

                if retries > config.max_retries {
                    warn!(
                        attempts = retries,
                        error = %e,
                        "Operation failed after exhausting retries"
                    );
                    return Err(e);
                }

                let base = config.delay_for(retries);
                let delay = if config.use_jitter {
                    apply_jitter(base)
                } else {
                    base
                };

                debug!(
                    "Operation failed (retry {}/{}): {}. Retrying in {}ms...",
                    retries, config.max_retries, e, delay
                );

                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
        }
    }
}

/// Scale `delay` by a pseudo-random factor between 50% and 100%.
fn apply_jitter(delay: u64) -> u64 {
    use std::collections::hash_map::RandomState;
    use std::hash::BuildHasher;

    let random_factor =
        (RandomState::new().hash_one(std::time::SystemTime::now()) % 50) as f64 / 100.0 + 0.5;

    (delay as f64 * random_factor) as u64
}
