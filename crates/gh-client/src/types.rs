//! GitHub API data transfer objects
//!
//! These types represent the data returned from the GitHub API.
//! They are intentionally separate from the watcher's derived state
//! to keep this crate pure and reusable.
//!
//! Status and conclusion values are kept as the raw strings GitHub sends
//! (`"queued"`, `"in_progress"`, `"success"`, ...). GitHub adds new values
//! from time to time and the watcher only ever compares against a few of them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status string GitHub reports for a job that has not been picked up yet
pub const STATUS_QUEUED: &str = "queued";

/// Conclusion string GitHub reports for a successful run or job
pub const CONCLUSION_SUCCESS: &str = "success";

/// A workflow definition (`.github/workflows/*.yml`) of a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflow {
    /// Workflow ID
    pub id: u64,

    /// Human readable workflow name (the `name:` key of the workflow file)
    pub name: String,

    /// When the workflow definition was last updated
    pub updated_at: DateTime<Utc>,
}

/// A single execution of a workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowRun {
    /// Workflow run ID
    pub id: u64,

    /// Title shown in the Actions UI (usually the head commit message)
    pub display_title: String,

    /// Status of the run (`queued`, `in_progress`, `completed`, ...)
    pub status: String,

    /// Conclusion, only present once GitHub has finalized the run
    pub conclusion: Option<String>,

    /// When the run was created
    pub created_at: DateTime<Utc>,

    /// When the current attempt of the run started
    pub run_started_at: DateTime<Utc>,

    /// Login of the user that triggered the run
    pub actor: String,
}

impl WorkflowRun {
    /// Whether GitHub has attached a conclusion to this run
    pub fn is_concluded(&self) -> bool {
        self.conclusion.is_some()
    }

    /// Whether the run concluded successfully
    pub fn succeeded(&self) -> bool {
        self.conclusion.as_deref() == Some(CONCLUSION_SUCCESS)
    }
}

/// A job of a workflow run, with its ordered steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Status of the job (`queued`, `in_progress`, `completed`, ...)
    pub status: String,

    /// Conclusion, only present once the job finished
    pub conclusion: Option<String>,

    /// Steps in execution order
    pub steps: Vec<Step>,
}

/// A single step of a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Step name as shown in the Actions UI
    pub name: String,

    /// Conclusion, `None` while the step has not finished
    pub conclusion: Option<String>,
}

/// An open pull request from the GitHub API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number (e.g., 123)
    pub number: u64,

    /// PR title
    pub title: String,

    /// PR state (`open` or `closed`)
    pub state: String,

    /// When the PR was created
    pub created_at: DateTime<Utc>,

    /// PR URL for opening in browser
    pub html_url: String,
}
