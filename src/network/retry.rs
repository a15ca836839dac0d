// src/network/retry.rs
//! Retry with jittered exponential backoff
//!
//! Pool requests are retried until they succeed. The delay between attempts
//! starts at 200ms and doubles after every failure up to one minute, and
//! each delay is scaled by a random factor in `[0.75, 1.0]` so miners that
//! lost the pool at the same moment do not come back in lockstep.

use crate::utils::error::MinerError;
use rand::Rng;
use rand::rngs::StdRng;
use std::future::Future;
use std::time::Duration;

/// Delay before the first retry
pub const INITIAL_DELAY: Duration = Duration::from_millis(200);

/// Upper bound on the delay between retries
pub const MAX_DELAY: Duration = Duration::from_millis(60_000);

/// Lower bound of the jitter factor applied to each delay
const MIN_JITTER: f64 = 0.75;

/// Unbounded retrier with jittered exponential backoff
#[derive(Debug, Clone)]
pub struct Backoff<R = StdRng> {
    rng: R,
    initial: Duration,
    max: Duration,
}

impl<R: Rng> Backoff<R> {
    /// Creates a retrier drawing jitter from `rng`
    pub fn new(rng: R) -> Self {
        Backoff {
            rng,
            initial: INITIAL_DELAY,
            max: MAX_DELAY,
        }
    }

    /// Invokes `op` until it succeeds
    ///
    /// `op` receives the number of failed attempts so far and the detail of
    /// the last failure (the pool's response payload when one was received,
    /// otherwise the error message), so it can change strategy after
    /// repeated failures.
    ///
    /// # Arguments
    /// * `action` - What is being attempted, for log lines
    /// * `context` - Prefix identifying the subsystem, e.g. `"[Pool]"`
    /// * `op` - The fallible operation
    pub async fn retry<T, F, Fut>(&mut self, action: &str, context: &str, mut op: F) -> T
    where
        F: FnMut(u32, Option<String>) -> Fut,
        Fut: Future<Output = Result<T, MinerError>>,
    {
        let mut attempts = 0u32;
        let mut last_error: Option<String> = None;
        let mut delay = self.initial;

        loop {
            if attempts > 0 {
                log::info!(
                    "{} Attempting to {} ({} failed attempts)",
                    context,
                    action,
                    attempts
                );
            }

            match op(attempts, last_error.clone()).await {
                Ok(value) => return value,
                Err(e) => {
                    let detail = e.detail();
                    log::warn!("{} Error with {}: {}", context, action, detail);
                    last_error = Some(detail);
                    attempts = attempts.saturating_add(1);

                    tokio::time::sleep(self.jittered(delay)).await;
                    delay = (delay * 2).min(self.max);
                }
            }
        }
    }

    fn jittered(&mut self, delay: Duration) -> Duration {
        delay.mul_f64(self.rng.gen_range(MIN_JITTER..=1.0))
    }
}
