//! Per-invocation watch configuration
//!
//! Built once by the binary from the config file and the command line, then
//! lent to every stage of the pipeline. Nothing mutates it afterwards.

use std::time::Duration;

use gh_deploy_config::AppConfig;

use crate::completion::Backoff;

/// What to watch and how
#[derive(Debug, Clone, PartialEq)]
pub struct WatchConfig {
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Workflow name, lower-cased for matching
    pub workflow: String,
    pub settings: WatchSettings,
}

/// Tunables of the pipeline stages
#[derive(Debug, Clone, PartialEq)]
pub struct WatchSettings {
    /// Workflow name (lower-cased) that triggers the related PR check
    pub cd_workflow: String,
    /// Repository searched for related PRs, same owner
    pub companion_repo: String,
    /// Token a related PR title must contain
    pub production_marker: String,
    /// Delay between job polls
    pub poll_interval: Duration,
    /// Give up tracking an active run after this long
    pub track_timeout: Option<Duration>,
    /// Spacing of run re-fetches while waiting for a conclusion
    pub conclusion_backoff: Backoff,
    /// Give up waiting for a conclusion after this long
    pub conclusion_timeout: Duration,
    /// Pause between the summary line and the PR check
    pub summary_pause: Duration,
    /// Open PRs inspected in the companion repository
    pub pr_candidates: u8,
    /// Number of countdown notifications for a matched PR
    pub countdown: u32,
    /// Delay between countdown notifications
    pub countdown_tick: Duration,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for WatchSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            cd_workflow: config.cd_workflow.to_lowercase(),
            companion_repo: config.companion_repo.clone(),
            production_marker: config.production_marker.clone(),
            poll_interval: Duration::from_secs(config.poll_interval_secs),
            track_timeout: config.track_timeout_secs.map(Duration::from_secs),
            conclusion_backoff: Backoff::default(),
            conclusion_timeout: Duration::from_secs(config.conclusion_timeout_secs),
            summary_pause: Duration::from_secs(1),
            pr_candidates: config.pr_candidates,
            countdown: config.countdown_secs,
            countdown_tick: Duration::from_secs(1),
        }
    }
}

impl WatchConfig {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        workflow: &str,
        settings: WatchSettings,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            workflow: workflow.to_lowercase(),
            settings,
        }
    }

    /// Whether the watched workflow is the continuous deployment workflow
    pub fn is_cd_workflow(&self) -> bool {
        self.workflow == self.settings.cd_workflow
    }

    /// Prefix a stage message with the workflow and repository
    pub fn stage_message(&self, message: &str) -> String {
        format!(
            "Workflow '{}' run for {}/{}: {}",
            self.workflow, self.owner, self.repo, message
        )
    }
}
