//! Bounded fixed-interval retry around a single backend call.

use std::future::Future;

use tabthreads_core::config::RetryPolicy;

use crate::BackendError;

/// The last error of a call that used up its attempts.
#[derive(Debug, Clone)]
pub struct Exhausted {
    pub error: BackendError,
    pub attempts: u32,
}

/// Run `op` until it succeeds or `policy.attempts()` calls have failed,
/// sleeping `policy.interval()` between attempts.
///
/// Every failure is retried regardless of kind; a disabled policy makes the
/// first failure final.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, backend: &'static str, mut op: F) -> Result<T, Exhausted>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, BackendError>>,
{
    let max_attempts = policy.attempts();
    let mut attempt = 1;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(error) if attempt < max_attempts => {
                tracing::warn!(
                    backend,
                    attempt,
                    max_attempts,
                    transient = error.is_transient(),
                    error = %error,
                    "backend call failed, retrying"
                );
                tokio::time::sleep(policy.interval()).await;
                attempt += 1;
            }
            Err(error) => {
                tracing::warn!(backend, attempts = attempt, error = %error, "backend call failed");
                return Err(Exhausted { error, attempts: attempt });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn failing(calls: Arc<AtomicU32>, succeed_on: u32) -> impl FnMut() -> std::future::Ready<Result<u32, BackendError>> {
        move || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            std::future::ready(if n >= succeed_on { Ok(n) } else { Err(BackendError::Timeout) })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_failures() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::default();

        let start = tokio::time::Instant::now();
        let result = with_retry(&policy, "test", failing(calls.clone(), 3)).await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(start.elapsed() >= Duration::from_millis(10_000));
        assert!(start.elapsed() < Duration::from_millis(11_000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausts_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::default();

        let result = with_retry(&policy, "test", failing(calls.clone(), u32::MAX)).await;

        let exhausted = result.unwrap_err();
        assert_eq!(exhausted.attempts, 5);
        assert!(matches!(exhausted.error, BackendError::Timeout));
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_fails_immediately() {
        let calls = Arc::new(AtomicU32::new(0));

        let start = tokio::time::Instant::now();
        let result = with_retry(&RetryPolicy::disabled(), "test", failing(calls.clone(), 2)).await;

        assert_eq!(result.unwrap_err().attempts, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(start.elapsed() < Duration::from_millis(1));
    }
}
