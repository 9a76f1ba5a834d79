/*!

Probing helpers used while bringing up a session with the cluster.

[`first_available`] polls a prioritized list of candidates, giving each a short timeout, and
returns the first one that yields a value. [`backoff_probe`] repeats an attempt with exponential
backoff while the attempt reports that it needs another try.

!*/

use futures::future::BoxFuture;
use log::{debug, warn};
use snafu::Snafu;
use std::future::Future;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, Error>;

/// The error type returned by [`backoff_probe`].
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("'{}' failed: {}", name, reason))]
    Failed { name: String, reason: String },

    #[snafu(display("'{}' was not ready after {} attempts: {}", name, attempts, reason))]
    Exhausted {
        name: String,
        attempts: u32,
        reason: String,
    },
}

/// One entry in the list given to [`first_available`]. The probe future is lazy; it only runs if
/// every higher priority candidate came up empty.
pub struct Candidate<'a, T> {
    name: String,
    probe: BoxFuture<'a, Option<T>>,
}

impl<'a, T> Candidate<'a, T> {
    pub fn new<S, F>(name: S, probe: F) -> Self
    where
        S: Into<String>,
        F: Future<Output = Option<T>> + Send + 'a,
    {
        Self {
            name: name.into(),
            probe: Box::pin(probe),
        }
    }
}

/// Polls `candidates` in order and returns the name and value of the first one that yields
/// `Some`. A candidate that does not finish within `per_candidate_timeout` is skipped.
pub async fn first_available<T>(
    candidates: Vec<Candidate<'_, T>>,
    per_candidate_timeout: Duration,
) -> Option<(String, T)> {
    for candidate in candidates {
        match tokio::time::timeout(per_candidate_timeout, candidate.probe).await {
            Ok(Some(value)) => {
                debug!("Using '{}'", candidate.name);
                return Some((candidate.name, value));
            }
            Ok(None) => debug!("'{}' is not available", candidate.name),
            Err(_) => debug!(
                "'{}' did not respond within {:?}",
                candidate.name, per_candidate_timeout
            ),
        }
    }
    None
}

/// What a single attempt of a [`backoff_probe`] observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome<T> {
    /// The probed thing is usable.
    Ready(T),
    /// Not usable yet, but it may become usable. The reason is kept for the final error.
    NeedsRetry(String),
    /// Not usable and retrying will not help.
    Failed(String),
}

/// Backoff settings for [`backoff_probe`].
#[derive(Clone, Debug, PartialEq)]
pub struct RetryConfig {
    /// The total number of attempts, including the first one. Values below 1 are treated as 1.
    pub max_attempts: u32,
    /// Delay after the first failed attempt.
    pub initial_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    /// The delay after the `attempt`th attempt (starting at 1) needed another try.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let delay = self.initial_delay.as_secs_f64() * self.backoff_multiplier.powi(exponent);
        if !delay.is_finite() || delay >= self.max_delay.as_secs_f64() {
            self.max_delay
        } else if delay <= 0.0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(delay)
        }
    }
}

/// Runs `attempt` until it reports [`ProbeOutcome::Ready`], backing off between attempts that
/// report [`ProbeOutcome::NeedsRetry`]. A [`ProbeOutcome::Failed`] stops immediately.
pub async fn backoff_probe<F, Fut, T>(config: &RetryConfig, name: &str, mut attempt: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ProbeOutcome<T>>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempts = 0;
    loop {
        attempts += 1;
        match attempt().await {
            ProbeOutcome::Ready(value) => return Ok(value),
            ProbeOutcome::Failed(reason) => return FailedSnafu { name, reason }.fail(),
            ProbeOutcome::NeedsRetry(reason) => {
                if attempts >= max_attempts {
                    return ExhaustedSnafu {
                        name,
                        attempts,
                        reason,
                    }
                    .fail();
                }
                let delay = config.delay_after(attempts);
                warn!(
                    "'{}' is not ready ({}), attempt {}/{}, retrying in {:?}",
                    name, reason, attempts, max_attempts, delay
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
