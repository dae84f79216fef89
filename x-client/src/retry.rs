use boltbot_core::{CoreError, ErrorRecovery, RecoveryStrategy};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of rate-limit waits before the error is returned
    pub max_rate_limit_waits: u32,
    /// Cap applied to each individual wait
    pub max_wait: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_rate_limit_waits: 3,
            max_wait: Duration::from_secs(15 * 60 + 5),
        }
    }
}

/// What the executor does with a failed attempt
#[derive(Debug, Clone, PartialEq)]
pub enum RetryStrategy {
    /// Sleep for the given delay, then try again
    RetryWithDelay(Duration),
    /// Return the error to the caller
    NoRetry,
}

/// Only rate limits are waited out. Everything else propagates immediately.
pub fn get_retry_strategy(error: &CoreError) -> RetryStrategy {
    match ErrorRecovery::determine_strategy(error) {
        RecoveryStrategy::WaitAndRetry { delay } => RetryStrategy::RetryWithDelay(delay),
        _ => RetryStrategy::NoRetry,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetryMetrics {
    pub rate_limit_waits: u64,
    pub total_wait_secs: u64,
    pub gave_up: u64,
}

/// Wraps an operation so that rate-limit responses block and retry
#[derive(Debug, Default)]
pub struct RetryExecutor {
    config: RetryConfig,
    rate_limit_waits: AtomicU64,
    total_wait_secs: AtomicU64,
    gave_up: AtomicU64,
}

impl RetryExecutor {
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Execute an operation, waiting out rate limits up to the configured bound
    pub async fn execute<F, Fut, T>(
        &self,
        operation_name: &str,
        operation: F,
    ) -> Result<T, CoreError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let mut waits = 0u32;

        loop {
            let error = match operation().await {
                Ok(result) => {
                    if waits > 0 {
                        info!(
                            "Operation {} succeeded after {} rate-limit waits",
                            operation_name, waits
                        );
                    }
                    return Ok(result);
                }
                Err(error) => error,
            };

            match get_retry_strategy(&error) {
                RetryStrategy::RetryWithDelay(delay) if waits < self.config.max_rate_limit_waits => {
                    let delay = delay.min(self.config.max_wait);
                    waits += 1;
                    self.rate_limit_waits.fetch_add(1, Ordering::Relaxed);
                    self.total_wait_secs
                        .fetch_add(delay.as_secs(), Ordering::Relaxed);

                    warn!(
                        "Rate limited during {}, waiting {:?} (wait {} of {})",
                        operation_name, delay, waits, self.config.max_rate_limit_waits
                    );
                    sleep(delay).await;
                }
                RetryStrategy::RetryWithDelay(_) => {
                    self.gave_up.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        "Giving up on {} after {} rate-limit waits",
                        operation_name, waits
                    );
                    return Err(error);
                }
                RetryStrategy::NoRetry => {
                    debug!("Not retrying {}: {}", operation_name, error);
                    return Err(error);
                }
            }
        }
    }

    pub fn get_metrics(&self) -> RetryMetrics {
        RetryMetrics {
            rate_limit_waits: self.rate_limit_waits.load(Ordering::Relaxed),
            total_wait_secs: self.total_wait_secs.load(Ordering::Relaxed),
            gave_up: self.gave_up.load(Ordering::Relaxed),
        }
    }
}
