use scribebot_core::CoreError;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,
    /// Base delay for exponential backoff (in milliseconds)
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000, // 1 second
        }
    }
}

/// Calculate the exponential backoff delay for a zero-based attempt index.
pub fn calculate_delay(attempt: u32, config: &RetryConfig) -> Duration {
    Duration::from_millis(config.base_delay_ms * 2u64.pow(attempt))
}

/// Wraps fallible async operations with retry logic.
///
/// Every failure is treated as retryable and handled identically; after the
/// configured number of attempts the last failure is returned to the caller
/// unchanged. No jitter, no circuit breaking.
#[derive(Debug, Clone)]
pub struct RetryExecutor {
    config: RetryConfig,
}

impl RetryExecutor {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Execute an operation, retrying on failure with exponential backoff.
    pub async fn execute<F, Fut, T>(
        &self,
        operation_name: &str,
        operation: F,
    ) -> Result<T, CoreError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let mut last_error: Option<CoreError> = None;

        for attempt in 0..self.config.max_attempts {
            if attempt > 0 {
                debug!("Retry attempt {} for {}", attempt, operation_name);
            }

            match operation().await {
                Ok(result) => {
                    if attempt > 0 {
                        info!(
                            "Operation {} succeeded after {} retries",
                            operation_name, attempt
                        );
                    }
                    return Ok(result);
                }
                Err(error) => {
                    warn!(
                        "Attempt {} failed for {}: {}",
                        attempt + 1,
                        operation_name,
                        error
                    );
                    last_error = Some(error);

                    if attempt + 1 < self.config.max_attempts {
                        let delay = calculate_delay(attempt, &self.config);
                        info!("Retrying {} in {:?}", operation_name, delay);
                        sleep(delay).await;
                    }
                }
            }
        }

        error!(
            "Operation {} failed after {} attempts",
            operation_name, self.config.max_attempts
        );

        // The loop records a failure before falling through; the fallback
        // only fires for a zero-attempt configuration.
        Err(last_error.unwrap_or_else(|| CoreError::Internal {
            message: format!("{} was never executed", operation_name),
        }))
    }
}
