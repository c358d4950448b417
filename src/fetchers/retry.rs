use crate::error::Result;
use std::time::Duration;
use tracing::warn;

/// Bounded retry with linear backoff.
///
/// After failed attempt `n` (1-based) the caller sleeps `n * backoff`, for at most
/// `max_retries` retries, so the operation runs up to `max_retries + 1` times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff: Duration) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.max_retries + 1
    }

    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff * attempt
    }

    /// Every sleep the policy would take if all attempts failed
    pub fn schedule(&self) -> Vec<Duration> {
        (1..=self.max_retries).map(|a| self.delay_after(a)).collect()
    }

    /// Run `op` until it succeeds or the attempts run out, returning the last error
    pub fn run<T, F, S>(&self, mut op: F, mut sleep: S) -> Result<T>
    where
        F: FnMut(u32) -> Result<T>,
        S: FnMut(Duration),
    {
        let mut attempt = 1;
        loop {
            match op(attempt) {
                Ok(value) => return Ok(value),
                Err(e) if attempt > self.max_retries => return Err(e),
                Err(e) => {
                    let delay = self.delay_after(attempt);
                    warn!(attempt, delay_secs = delay.as_secs_f64(), error = %e, "attempt failed, retrying");
                    sleep(delay);
                    attempt += 1;
                }
            }
        }
    }
}
