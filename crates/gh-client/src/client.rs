//! GitHub client trait
//!
//! This module defines the core `GitHubClient` trait that all client
//! implementations must satisfy. Every operation is read-only.

use crate::types::{Job, PullRequest, Workflow, WorkflowRun};
use async_trait::async_trait;

/// GitHub API client trait
///
/// Defines the interface the deployment watcher needs from GitHub.
/// The production implementation is [`crate::OctocrabClient`]; tests
/// provide scripted implementations.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow sharing across
/// async tasks and threads.
///
/// # Example
///
/// ```rust,ignore
/// use gh_client::{GitHubClient, Workflow};
///
/// async fn workflows(client: &dyn GitHubClient) -> anyhow::Result<Vec<Workflow>> {
///     client.list_workflows("rust-lang", "rust").await
/// }
/// ```
#[async_trait]
pub trait GitHubClient: Send + Sync {
    /// List the workflows defined in a repository
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner (user or organization)
    /// * `repo` - Repository name
    ///
    /// # Returns
    ///
    /// Workflows in the order GitHub lists them.
    async fn list_workflows(&self, owner: &str, repo: &str) -> anyhow::Result<Vec<Workflow>>;

    /// Fetch the most recent run of a workflow
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    /// * `workflow_id` - Workflow ID as returned by [`GitHubClient::list_workflows`]
    ///
    /// # Returns
    ///
    /// The newest run, or `None` if the workflow never ran.
    async fn latest_workflow_run(
        &self,
        owner: &str,
        repo: &str,
        workflow_id: u64,
    ) -> anyhow::Result<Option<WorkflowRun>>;

    /// Fetch a single workflow run by ID
    async fn workflow_run(&self, owner: &str, repo: &str, run_id: u64)
        -> anyhow::Result<WorkflowRun>;

    /// Fetch the latest job of a workflow run
    ///
    /// Only the most recent attempt's first job is returned (`filter=latest`,
    /// page size 1).
    ///
    /// # Returns
    ///
    /// The job, or `None` when GitHub has not created any job yet.
    async fn latest_job(&self, owner: &str, repo: &str, run_id: u64)
        -> anyhow::Result<Option<Job>>;

    /// List open pull requests, newest first
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    /// * `limit` - Maximum number of pull requests to return (one page)
    async fn list_open_pull_requests(
        &self,
        owner: &str,
        repo: &str,
        limit: u8,
    ) -> anyhow::Result<Vec<PullRequest>>;
}
