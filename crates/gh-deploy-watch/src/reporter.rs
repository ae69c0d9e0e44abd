//! Progress events and the reporter seam
//!
//! The pipeline never draws anything itself. It emits [`ProgressEvent`]s to
//! a [`ProgressReporter`]; the binary renders them in the terminal and the
//! tests record them.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use gh_client::WorkflowRun;

use crate::config::WatchConfig;
use crate::progress::ActiveRunDetails;

/// Something the operator should see
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// Overwritable status line
    Stage(String),
    /// The job went (back) to the queue
    Queued(ActiveRunDetails),
    /// The job started running; a progress bar appears
    BarCreated {
        details: ActiveRunDetails,
        started_at: DateTime<Utc>,
    },
    /// A poll produced new progress for the running job
    BarUpdated(ActiveRunDetails),
    /// The job concluded; the bar is finalized
    BarFinished(ActiveRunDetails),
    /// Final line describing the concluded run
    Summary(RunSummary),
    /// A related infrastructure PR is about to be merged
    Countdown {
        pr_title: String,
        remaining: u32,
        /// Status line text, prefixed like every stage message
        message: String,
    },
}

/// Receives progress events
///
/// The reporter is owned by the top-level driver and lent to each stage.
pub trait ProgressReporter {
    fn report(&mut self, event: ProgressEvent) -> std::io::Result<()>;

    /// Flush whatever is still on screen once the watch ends
    fn finish(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Reporter keeping every event in memory
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub events: Vec<ProgressEvent>,
}

impl ProgressReporter for RecordingReporter {
    fn report(&mut self, event: ProgressEvent) -> std::io::Result<()> {
        self.events.push(event);
        Ok(())
    }
}

/// Outcome marker of a concluded run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunIcon {
    Success,
    Failure,
}

impl fmt::Display for RunIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunIcon::Success => f.write_str("✅"),
            RunIcon::Failure => f.write_str("💥"),
        }
    }
}

/// One-line description of a concluded run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub icon: RunIcon,
    pub owner: String,
    pub repo: String,
    pub display_title: String,
    pub actor: String,
    pub status: String,
    pub conclusion: String,
    pub created_at: DateTime<Utc>,
}

impl RunSummary {
    pub fn new(config: &WatchConfig, run: &WorkflowRun) -> Self {
        Self {
            icon: if run.succeeded() {
                RunIcon::Success
            } else {
                RunIcon::Failure
            },
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            display_title: run.display_title.clone(),
            actor: run.actor.clone(),
            status: run.status.clone(),
            conclusion: run.conclusion.clone().unwrap_or_default(),
            created_at: run.created_at,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}/{} workflows: run '{}' by {} {} as {} at {}",
            self.icon,
            self.owner,
            self.repo,
            self.display_title,
            self.actor,
            self.status,
            self.conclusion,
            self.created_at
        )
    }
}

/// Text in front of the progress bar: elapsed time and `i/total. step`
pub fn bar_prefix(details: &ActiveRunDetails, elapsed: Duration) -> String {
    let step = format!(
        "{}/{}. {} ",
        details.current, details.total, details.step_name
    );
    format!("{} {}", pretty_duration(elapsed), resize(&step, 30))
}

/// Compact duration like `45s`, `3m07s` or `1h02m`
pub fn pretty_duration(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    match (secs / 3600, (secs % 3600) / 60, secs % 60) {
        (0, 0, s) => format!("{s}s"),
        (0, m, s) => format!("{m}m{s:02}s"),
        (h, m, _) => format!("{h}h{m:02}m"),
    }
}

/// Pad or truncate to exactly `width` characters
fn resize(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count > width {
        let mut truncated: String = text.chars().take(width.saturating_sub(1)).collect();
        truncated.push('…');
        truncated
    } else {
        format!("{text:<width$}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WatchSettings;
    use pretty_assertions::assert_eq;

    fn run(conclusion: &str) -> WorkflowRun {
        WorkflowRun {
            id: 1,
            display_title: "Release v2".to_string(),
            status: "completed".to_string(),
            conclusion: Some(conclusion.to_string()),
            created_at: DateTime::parse_from_rfc3339("2024-03-01T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            run_started_at: Utc::now(),
            actor: "octocat".to_string(),
        }
    }

    #[test]
    fn test_summary_line() {
        let config = WatchConfig::new("acme", "svc", "cd", WatchSettings::default());
        let summary = RunSummary::new(&config, &run("success"));

        assert_eq!(summary.icon, RunIcon::Success);
        assert_eq!(
            summary.to_string(),
            "✅ acme/svc workflows: run 'Release v2' by octocat completed as success at 2024-03-01 10:00:00 UTC"
        );
    }

    #[test]
    fn test_summary_icon_for_non_success() {
        let config = WatchConfig::new("acme", "svc", "cd", WatchSettings::default());

        for conclusion in ["failure", "cancelled", "timed_out", "skipped"] {
            assert_eq!(
                RunSummary::new(&config, &run(conclusion)).icon,
                RunIcon::Failure
            );
        }
    }

    #[test]
    fn test_pretty_duration() {
        assert_eq!(pretty_duration(Duration::from_secs(0)), "0s");
        assert_eq!(pretty_duration(Duration::from_secs(45)), "45s");
        assert_eq!(pretty_duration(Duration::from_secs(187)), "3m07s");
        assert_eq!(pretty_duration(Duration::from_secs(3720)), "1h02m");
    }

    #[test]
    fn test_bar_prefix_is_fixed_width() {
        let details = ActiveRunDetails {
            total: 4,
            current: 3,
            step_name: "build".to_string(),
            is_done: false,
            status: "in_progress".to_string(),
        };

        let prefix = bar_prefix(&details, Duration::from_secs(65));
        assert_eq!(prefix, format!("1m05s {:<30}", "3/4. build "));

        let long = ActiveRunDetails {
            step_name: "Run a very long deployment step name that overflows".to_string(),
            ..details
        };
        let prefix = bar_prefix(&long, Duration::from_secs(5));
        assert_eq!(prefix.chars().count(), "5s ".len() + 30);
        assert!(prefix.ends_with('…'));
    }

    #[test]
    fn test_recording_reporter_keeps_order() {
        let mut reporter = RecordingReporter::default();
        reporter
            .report(ProgressEvent::Stage("one".to_string()))
            .unwrap();
        reporter
            .report(ProgressEvent::Stage("two".to_string()))
            .unwrap();

        assert_eq!(
            reporter.events,
            vec![
                ProgressEvent::Stage("one".to_string()),
                ProgressEvent::Stage("two".to_string()),
            ]
        );
    }
}
