//! Retry policy for transient adapter failures: exponential backoff capped
//! at 5 attempts and 60 seconds total, per the source-adapter contract.

use std::future::Future;
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};

use crate::error::AdapterError;

fn builder() -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_min_delay(Duration::from_millis(250))
        .with_max_delay(Duration::from_secs(60))
        .with_max_times(5)
}

/// Runs `f`, retrying transient failures with exponential backoff. Terminal
/// failures are returned immediately without retry.
///
/// # Errors
/// Returns the last `AdapterError` once retries are exhausted or on the
/// first terminal error.
pub async fn with_retry<T, F, Fut>(f: F) -> Result<T, AdapterError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AdapterError>>,
{
    f.retry(builder())
        .when(AdapterError::is_retryable)
        .notify(|err: &AdapterError, dur: Duration| {
            tracing::warn!(error = %err, delay = ?dur, "retrying transient adapter failure");
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn retries_transient_until_success() {
        let attempts = AtomicU32::new(0);
        let result = with_retry(|| async {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                Err(AdapterError::Transient("not yet".into()))
            } else {
                Ok(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn terminal_errors_are_not_retried() {
        let attempts = AtomicU32::new(0);
        let result: Result<(), AdapterError> = with_retry(|| async {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err(AdapterError::Terminal("bad record".into()))
        })
        .await;
        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
