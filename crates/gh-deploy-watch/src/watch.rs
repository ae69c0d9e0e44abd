//! Top-level watch pipeline
//!
//! ```text
//! resolve workflow ─► latest run ─► [track job ─► await conclusion] ─► summary ─► [related PR]
//! ```
//!
//! Tracking only happens for an unconcluded run, the related PR check only
//! for the continuous deployment workflow.

use chrono::Utc;
use gh_client::{GitHubClient, PullRequest, WorkflowRun};
use tokio::time::sleep;

use crate::completion::await_conclusion;
use crate::config::WatchConfig;
use crate::error::WatchError;
use crate::related_pr::announce_related_pr;
use crate::reporter::{ProgressEvent, ProgressReporter, RunSummary};
use crate::resolver::resolve_workflow;
use crate::tracker::track_active_run;

/// What a completed watch observed
#[derive(Debug, Clone, PartialEq)]
pub struct WatchOutcome {
    /// The run as last fetched, always concluded
    pub run: WorkflowRun,
    /// Infrastructure PR announced after the run, if any
    pub related_pr: Option<PullRequest>,
}

/// Watch the latest run of the configured workflow to its conclusion
pub async fn watch<C, R>(
    client: &C,
    config: &WatchConfig,
    reporter: &mut R,
) -> Result<WatchOutcome, WatchError>
where
    C: GitHubClient + ?Sized,
    R: ProgressReporter + ?Sized,
{
    reporter.report(ProgressEvent::Stage(
        config.stage_message("searching workflows"),
    ))?;
    let workflows = client.list_workflows(&config.owner, &config.repo).await?;
    let workflow = resolve_workflow(&workflows, &config.workflow, Utc::now())?;

    reporter.report(ProgressEvent::Stage(config.stage_message(&format!(
        "found '{}', checking latest runs",
        config.workflow
    ))))?;
    let run = client
        .latest_workflow_run(&config.owner, &config.repo, workflow.id)
        .await?
        .ok_or(WatchError::NoRunsFound {
            workflow_id: workflow.id,
        })?;
    log::info!(
        "Latest run of '{}' is {} ({}, {:?})",
        workflow.name,
        run.id,
        run.status,
        run.conclusion
    );

    let run = if run.is_concluded() {
        run
    } else {
        track_active_run(client, config, &run, reporter).await?;
        await_conclusion(client, config, run.id).await?
    };

    reporter.report(ProgressEvent::Summary(RunSummary::new(config, &run)))?;
    sleep(config.settings.summary_pause).await;

    let related_pr = if config.is_cd_workflow() {
        announce_related_pr(client, config, &run, reporter).await?
    } else {
        None
    };

    Ok(WatchOutcome { run, related_pr })
}
