//! Timeout racing and fixed-budget retry for remote calls.

use std::future::Future;
use std::time::Duration;

use log::{debug, warn};
use tokio::time::{sleep, timeout};

use crate::config::RetryConfig;
use crate::error::CookflowError;

/// Attempt budget, backoff and per-attempt timeout for one logical
/// remote call. The backoff is constant, not exponential.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            backoff: Duration::from_secs(1),
            timeout: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Policy for extraction and categorization calls.
    pub fn from_config(retry: &RetryConfig) -> Self {
        Self {
            max_attempts: retry.max_attempts,
            backoff: Duration::from_millis(retry.backoff_ms),
            timeout: Duration::from_secs(retry.timeout_secs),
        }
    }

    /// Single-attempt policy for short product-name lookups.
    pub fn lookup_from_config(retry: &RetryConfig) -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::from_millis(retry.backoff_ms),
            timeout: Duration::from_secs(retry.lookup_timeout_secs),
        }
    }
}

/// Run an operation under the policy's timeout and retry budget.
///
/// Each attempt is raced against the per-attempt timeout; a fired timer
/// counts as a timeout failure for that attempt (the losing future is
/// dropped, though the remote side may keep working). Any failure -
/// transport, timeout, parse, validation - consumes one attempt; with
/// attempts remaining the constant backoff is slept and the operation
/// runs again. Exhausting the budget yields a single exhaustion error
/// carrying the last underlying failure's message.
pub async fn run_bounded<T, F, Fut>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, CookflowError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CookflowError>>,
{
    let mut last_error: Option<CookflowError> = None;

    for attempt in 1..=policy.max_attempts {
        debug!("Remote call attempt {}/{}", attempt, policy.max_attempts);

        let outcome = match timeout(policy.timeout, operation()).await {
            Ok(result) => result,
            Err(_) => Err(CookflowError::Timeout(policy.timeout)),
        };

        match outcome {
            Ok(value) => return Ok(value),
            Err(e) => {
                warn!(
                    "Attempt {}/{} failed: {}",
                    attempt, policy.max_attempts, e
                );
                last_error = Some(e);

                if attempt < policy.max_attempts {
                    sleep(policy.backoff).await;
                }
            }
        }
    }

    let last = last_error
        .map(|e| e.to_string())
        .unwrap_or_else(|| "no attempts were made".to_string());

    Err(CookflowError::Exhausted {
        attempts: policy.max_attempts,
        last,
    })
}
