//! Active run progress tracking
//!
//! Polls the latest job of an unfinished run at a fixed interval until the
//! job reports a conclusion. States:
//!
//! ```text
//!   Queued ──► Running(i/total) ──► Done
//!     ▲             │
//!     └─────────────┘   (a re-run puts the job back in the queue)
//! ```
//!
//! `Queued` is reported once per transition into it, `Running` creates the
//! progress bar and then updates it on every poll. An empty job list keeps
//! the previous progress; a fetch error aborts tracking.

use gh_client::{GitHubClient, WorkflowRun};
use tokio::time::{Instant, sleep};

use crate::config::WatchConfig;
use crate::error::WatchError;
use crate::progress::{ActiveRunDetails, JobPhase};
use crate::reporter::{ProgressEvent, ProgressReporter};

/// Follow `run` until its latest job concludes
///
/// Returns the details of the final poll, which always have `is_done` set.
pub async fn track_active_run<C, R>(
    client: &C,
    config: &WatchConfig,
    run: &WorkflowRun,
    reporter: &mut R,
) -> Result<ActiveRunDetails, WatchError>
where
    C: GitHubClient + ?Sized,
    R: ProgressReporter + ?Sized,
{
    let settings = &config.settings;
    let started = Instant::now();
    let mut details = ActiveRunDetails::initial();
    let mut shown: Option<JobPhase> = None;

    loop {
        if let Some(limit) = settings.track_timeout {
            if started.elapsed() >= limit {
                log::warn!("Giving up on run {} after {:?}", run.id, limit);
                return Err(WatchError::TrackingTimeout {
                    run_id: run.id,
                    waited: limit,
                });
            }
        }

        match client
            .latest_job(&config.owner, &config.repo, run.id)
            .await?
        {
            Some(job) => details = ActiveRunDetails::reduce(&job),
            None => log::debug!("Run {} has no jobs yet, keeping last progress", run.id),
        }

        match details.phase() {
            JobPhase::Queued => {
                if shown != Some(JobPhase::Queued) {
                    log::info!("Run {} is queued", run.id);
                    reporter.report(ProgressEvent::Stage(config.stage_message("job is queued")))?;
                    reporter.report(ProgressEvent::Queued(details.clone()))?;
                    shown = Some(JobPhase::Queued);
                }
            }
            JobPhase::Running | JobPhase::Done => {
                if shown == Some(JobPhase::Running) {
                    reporter.report(ProgressEvent::BarUpdated(details.clone()))?;
                } else {
                    log::info!("Run {} is running", run.id);
                    reporter.report(ProgressEvent::Stage(config.stage_message("running job")))?;
                    reporter.report(ProgressEvent::BarCreated {
                        details: details.clone(),
                        started_at: run.run_started_at,
                    })?;
                    shown = Some(JobPhase::Running);
                }

                if details.is_done {
                    log::info!(
                        "Job of run {} finished after {:?}",
                        run.id,
                        started.elapsed()
                    );
                    reporter.report(ProgressEvent::BarFinished(details.clone()))?;
                    return Ok(details);
                }

                log::debug!(
                    "Run {} at step {}/{} '{}'",
                    run.id,
                    details.current,
                    details.total,
                    details.step_name
                );
            }
        }

        sleep(settings.poll_interval).await;
    }
}
