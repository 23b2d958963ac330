//! Bounded exponential-backoff fetching.
//!
//! The elapsed-time budget is checked only after an attempt fails, so a
//! call may run past `max_duration` by up to one backoff sleep before it
//! gives up. Backoff doubles after every failure, without jitter or cap.

use std::time::Duration;

use thiserror::Error;
use tokio::time::{Instant, sleep};

use crate::error::AppError;
use crate::models::ServerStatus;
use crate::services::StatusSource;

/// Initial backoff for budgets of at least this length.
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(10);

/// Smallest initial backoff used for tiny budgets.
pub const MIN_BACKOFF: Duration = Duration::from_millis(1);

/// Growth of the backoff after each failed attempt.
pub const BACKOFF_FACTOR: u32 = 2;

/// Every attempt failed and the retry budget is used up.
#[derive(Error, Debug)]
#[error("failed after {}: {source}", budget(.max_duration))]
pub struct FetchFailure {
    /// Error of the last attempt
    pub source: AppError,
    /// Time from the first attempt until giving up
    pub elapsed: Duration,
    /// Configured retry budget
    pub max_duration: Duration,
    /// Number of fetch attempts made
    pub attempts: u32,
}

fn budget(max_duration: &Duration) -> humantime::FormattedDuration {
    humantime::format_duration(*max_duration)
}

/// Backoff schedule for one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Sleep after the first failure
    pub initial_backoff: Duration,
    /// Total failure budget
    pub max_duration: Duration,
}

impl RetryPolicy {
    /// Policy for a total budget of `max_duration`.
    ///
    /// Budgets shorter than [`DEFAULT_BACKOFF`] start at half the budget,
    /// floored at [`MIN_BACKOFF`].
    pub fn new(max_duration: Duration) -> Self {
        let initial_backoff = if max_duration < DEFAULT_BACKOFF {
            (max_duration / 2).max(MIN_BACKOFF)
        } else {
            DEFAULT_BACKOFF
        };

        Self {
            initial_backoff,
            max_duration,
        }
    }

    /// Unbounded sequence of sleeps: initial, 2x, 4x, ...
    pub fn backoffs(&self) -> impl Iterator<Item = Duration> {
        std::iter::successors(Some(self.initial_backoff), |backoff| {
            Some(backoff.saturating_mul(BACKOFF_FACTOR))
        })
    }

    /// Call `source` until it succeeds or a failure lands past the budget.
    pub async fn run(
        &self,
        source: &dyn StatusSource,
    ) -> std::result::Result<Vec<ServerStatus>, FetchFailure> {
        let start = Instant::now();
        let mut backoffs = self.backoffs();
        let mut attempts = 0;

        loop {
            attempts += 1;
            let error = match source.fetch().await {
                Ok(servers) => {
                    if attempts > 1 {
                        log::info!("Fetched server status after {} attempts", attempts);
                    }
                    return Ok(servers);
                }
                Err(error) => error,
            };

            let elapsed = start.elapsed();
            if elapsed >= self.max_duration {
                return Err(FetchFailure {
                    source: error,
                    elapsed,
                    max_duration: self.max_duration,
                    attempts,
                });
            }

            let backoff = backoffs.next().unwrap_or(self.initial_backoff);
            log::warn!(
                "Error fetching API: {}. Retrying in {}...",
                error,
                humantime::format_duration(backoff)
            );
            sleep(backoff).await;
        }
    }
}

/// Fetch with the default backoff schedule for `max_duration`.
pub async fn fetch_with_retry(
    source: &dyn StatusSource,
    max_duration: Duration,
) -> std::result::Result<Vec<ServerStatus>, FetchFailure> {
    RetryPolicy::new(max_duration).run(source).await
}
