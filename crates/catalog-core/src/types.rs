//! Common types used across the course catalog assistant

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

use crate::{Error, Result};

/// Configuration for retry behavior on external calls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Deadline applied to every single attempt
    pub attempt_timeout: Duration,
    /// Pause before the next attempt
    pub backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            attempt_timeout: Duration::from_secs(60),
            backoff: Duration::from_millis(500),
        }
    }
}

impl RetryConfig {
    /// Run `call` under a per-attempt timeout, retrying transient failures
    pub async fn run<T, F, Fut>(&self, label: &str, mut call: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let outcome = match tokio::time::timeout(self.attempt_timeout, call()).await {
                Ok(result) => result,
                Err(_) => Err(Error::Timeout(format!(
                    "{} timed out after {:?}",
                    label, self.attempt_timeout
                ))),
            };

            match outcome {
                Err(e) if e.is_transient() && attempt < attempts => {
                    tracing::warn!(%label, attempt, error = %e, "transient failure, retrying");
                    tokio::time::sleep(self.backoff).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_retry() -> RetryConfig {
        RetryConfig {
            max_attempts: 2,
            attempt_timeout: Duration::from_millis(200),
            backoff: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_retries_transient_once() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result = fast_retry()
            .run("probe", move || async move {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(Error::Network("connection reset".to_string()))
                } else {
                    Ok(7)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_does_not_retry_permanent_errors() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<()> = fast_retry()
            .run("probe", move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(Error::LLMProvider("bad request".to_string()))
            })
            .await;

        assert!(matches!(result, Err(Error::LLMProvider(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<()> = fast_retry()
            .run("probe", move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(Error::Network("unreachable".to_string()))
            })
            .await;

        assert!(matches!(result, Err(Error::Network(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_attempt_timeout() {
        let config = RetryConfig {
            max_attempts: 1,
            attempt_timeout: Duration::from_millis(10),
            backoff: Duration::from_millis(1),
        };
        let result: Result<()> = config
            .run("slow", || async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(Error::Timeout(_))));
    }
}
