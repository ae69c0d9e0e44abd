//! Waiting for a finished run to report its conclusion
//!
//! GitHub records job completion and run conclusion separately, so the run
//! resource can lag behind its job for a while. We re-fetch the run with
//! exponential backoff until the conclusion shows up or the deadline passes.

use std::time::Duration;

use gh_client::{GitHubClient, WorkflowRun};
use tokio::time::{Instant, sleep};

use crate::config::WatchConfig;
use crate::error::WatchError;

/// Exponential backoff between run re-fetches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backoff {
    /// Delay before the first re-fetch
    pub initial_delay: Duration,
    /// Cap for exponential growth
    pub max_delay: Duration,
    /// Multiplier applied per attempt (typically 2.0)
    pub multiplier: f64,
}

impl Backoff {
    pub const DEFAULT: Self = Self {
        initial_delay: Duration::from_secs(1),
        max_delay: Duration::from_secs(10),
        multiplier: 2.0,
    };

    /// Computes the delay after the given attempt (0-indexed).
    ///
    /// `initial_delay * multiplier^attempt`, capped at `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = self.multiplier.powi(attempt.min(i32::MAX as u32) as i32);
        let delay_secs = self.initial_delay.as_secs_f64() * factor;
        Duration::from_secs_f64(delay_secs.min(self.max_delay.as_secs_f64()))
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Re-fetch run `run_id` until it carries a conclusion
///
/// Fails with [`WatchError::ConclusionTimeout`] when the next wait would
/// overrun `conclusion_timeout`.
pub async fn await_conclusion<C>(
    client: &C,
    config: &WatchConfig,
    run_id: u64,
) -> Result<WorkflowRun, WatchError>
where
    C: GitHubClient + ?Sized,
{
    let settings = &config.settings;
    let started = Instant::now();
    let mut attempt = 0;

    loop {
        let run = client
            .workflow_run(&config.owner, &config.repo, run_id)
            .await?;

        if let Some(conclusion) = &run.conclusion {
            log::info!(
                "Run {} concluded as {} after {} re-fetches",
                run_id,
                conclusion,
                attempt
            );
            return Ok(run);
        }

        let delay = settings.conclusion_backoff.delay_for_attempt(attempt);
        if started.elapsed() + delay > settings.conclusion_timeout {
            log::warn!(
                "Run {} still has no conclusion after {:?}",
                run_id,
                started.elapsed()
            );
            return Err(WatchError::ConclusionTimeout {
                run_id,
                waited: settings.conclusion_timeout,
            });
        }

        log::debug!(
            "Run {} has no conclusion yet (status {}), retrying in {:?}",
            run_id,
            run.status,
            delay
        );
        sleep(delay).await;
        attempt += 1;
    }
}
