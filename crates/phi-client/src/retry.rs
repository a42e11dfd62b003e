//! Back-off policy for the client's idempotent reads.
//!
//! Story, feed, instant-preview and auth requests run through
//! [`RetryPolicy::run`]. Task creation and task polling never do: a
//! submission is exactly one request, and the poller retries on its own tick.

use std::future::Future;
use std::time::Duration;

use crate::error::ClientError;

/// Longest single sleep between attempts.
const MAX_DELAY: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct RetryPolicy {
    /// Extra attempts after the first; zero disables retrying.
    pub(crate) max_retries: u32,
    pub(crate) base_ms: u64,
}

impl RetryPolicy {
    pub(crate) fn new(max_retries: u32, base_ms: u64) -> Self {
        Self {
            max_retries,
            base_ms,
        }
    }

    /// Sleep before retry number `retry` (1-based): `base * 2^(retry-1)`,
    /// capped at [`MAX_DELAY`], then scaled by `jitter` (expected in
    /// `0.75..=1.25`).
    pub(crate) fn delay(&self, retry: u32, jitter: f64) -> Duration {
        let doublings = retry.saturating_sub(1).min(16);
        let raw = self.base_ms.saturating_mul(1u64 << doublings);
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let capped_ms = raw.min(MAX_DELAY.as_millis() as u64) as f64;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Duration::from_millis((capped_ms * jitter) as u64)
    }

    /// Runs `operation`, retrying transient failures (see
    /// [`ClientError::is_transient`]) up to `max_retries` times. The last
    /// error is returned once attempts run out.
    pub(crate) async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, ClientError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let mut retry = 0u32;
        loop {
            let err = match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            if retry >= self.max_retries || !err.is_transient() {
                return Err(err);
            }
            retry += 1;
            let delay = self.delay(retry, rand::random_range(0.75..=1.25));
            tracing::warn!(
                retry,
                max_retries = self.max_retries,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %err,
                "backend read failed, backing off"
            );
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    fn api(status: u16) -> ClientError {
        ClientError::Api {
            status,
            detail: String::new(),
        }
    }

    /// Hands out canned outcomes in order and records how many were taken.
    struct Script(Mutex<VecDeque<Result<&'static str, ClientError>>>);

    impl Script {
        fn new(steps: Vec<Result<&'static str, ClientError>>) -> Self {
            Self(Mutex::new(steps.into()))
        }

        fn next(&self) -> Result<&'static str, ClientError> {
            self.0
                .lock()
                .unwrap()
                .pop_front()
                .expect("operation called more often than scripted")
        }

        fn remaining(&self) -> usize {
            self.0.lock().unwrap().len()
        }
    }

    #[test]
    fn delay_doubles_per_retry_and_caps() {
        let policy = RetryPolicy::new(5, 1_000);
        assert_eq!(policy.delay(1, 1.0), Duration::from_millis(1_000));
        assert_eq!(policy.delay(2, 1.0), Duration::from_millis(2_000));
        assert_eq!(policy.delay(4, 1.0), Duration::from_millis(8_000));
        assert_eq!(policy.delay(12, 1.0), MAX_DELAY);
        assert_eq!(policy.delay(2, 0.75), Duration::from_millis(1_500));
    }

    #[test]
    fn zero_base_never_sleeps() {
        assert_eq!(RetryPolicy::new(3, 0).delay(3, 1.25), Duration::ZERO);
    }

    #[test]
    fn throttling_and_server_statuses_are_transient() {
        for status in [408, 429, 500, 502, 503] {
            assert!(api(status).is_transient(), "{status} should be retried");
        }
        for status in [400, 401, 402, 403, 422] {
            assert!(!api(status).is_transient(), "{status} should not be retried");
        }
        assert!(!ClientError::NotFound { url: "http://x/api/task/t".into() }.is_transient());
        assert!(!ClientError::MissingTaskId.is_transient());
    }

    #[tokio::test]
    async fn gateway_errors_are_retried_until_success() {
        let script = Script::new(vec![Err(api(502)), Err(api(504)), Ok("story")]);

        let got = RetryPolicy::new(3, 0).run(|| async { script.next() }).await;

        assert_eq!(got.unwrap(), "story");
        assert_eq!(script.remaining(), 0);
    }

    #[tokio::test]
    async fn client_errors_return_on_first_attempt() {
        let script = Script::new(vec![Err(api(403)), Ok("unreachable")]);

        let got = RetryPolicy::new(3, 0).run(|| async { script.next() }).await;

        assert!(matches!(got, Err(ClientError::Api { status: 403, .. })));
        assert_eq!(script.remaining(), 1);
    }

    #[tokio::test]
    async fn last_error_is_returned_when_retries_run_out() {
        let script = Script::new(vec![Err(api(500)), Err(api(503)), Ok("late")]);

        let got = RetryPolicy::new(1, 0).run(|| async { script.next() }).await;

        assert!(matches!(got, Err(ClientError::Api { status: 503, .. })));
        assert_eq!(script.remaining(), 1);
    }

    #[tokio::test]
    async fn default_policy_makes_a_single_attempt() {
        let script = Script::new(vec![Err(api(500)), Ok("never")]);

        let got = RetryPolicy::default().run(|| async { script.next() }).await;

        assert!(got.is_err());
        assert_eq!(script.remaining(), 1);
    }
}
