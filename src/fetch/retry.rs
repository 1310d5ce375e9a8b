//! Bounded retry with a fixed pause between attempts
//!
//! Shared by the HTTP fetcher, the fetch-and-parse wrapper and the audit
//! runner.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// How many times to try an operation and how long to wait in between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub attempts: u32,
    /// Pause between consecutive attempts
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    /// Builds a policy from config values expressed in seconds
    pub fn from_secs(attempts: u32, delay_seconds: u64) -> Self {
        Self::new(attempts, Duration::from_secs(delay_seconds))
    }

    /// Runs `op` until it succeeds, `should_retry` rejects the error, or the
    /// attempts are used up
    ///
    /// `op` receives the 1-based attempt number. The last error is returned
    /// when the policy gives up. There is no pause after the final attempt.
    ///
    /// # Example
    ///
    /// ```
    /// use sitemap_sweep::fetch::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let policy = RetryPolicy::new(3, Duration::ZERO);
    /// let result: Result<u32, String> = policy
    ///     .run(
    ///         |attempt| async move { if attempt < 3 { Err("busy".to_string()) } else { Ok(attempt) } },
    ///         |_| true,
    ///     )
    ///     .await;
    /// assert_eq!(result, Ok(3));
    /// # }
    /// ```
    pub async fn run<T, E, F, Fut, P>(&self, mut op: F, should_retry: P) -> Result<T, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
        E: Display,
    {
        let attempts = self.attempts.max(1);
        let mut attempt = 1;

        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    if attempt >= attempts || !should_retry(&e) {
                        return Err(e);
                    }
                    tracing::debug!(
                        "Attempt {}/{} failed, backing off: {}",
                        attempt,
                        attempts,
                        e
                    );
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
