//! Octocrab-based GitHub API client
//!
//! Direct implementation of the `GitHubClient` trait using the octocrab library.
//! Every call hits the API; watching a deployment needs fresh data on each poll.
//!
//! All endpoints go through raw GET requests with our own payload types.
//! The Actions models shipped with octocrab are stricter than what GitHub
//! returns for runs that are still starting up (missing `steps`, missing
//! `run_started_at`), so we only deserialize the fields we read.

use crate::client::GitHubClient;
use crate::types::{Job, PullRequest, Step, Workflow, WorkflowRun};
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, trace};
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Direct GitHub API client using octocrab
#[derive(Debug, Clone)]
pub struct OctocrabClient {
    octocrab: Arc<Octocrab>,
}

impl OctocrabClient {
    /// Create a new client with the given octocrab instance
    pub fn new(octocrab: Arc<Octocrab>) -> Self {
        Self { octocrab }
    }

    async fn get_json<R, P>(&self, route: &str, params: Option<&P>) -> octocrab::Result<R>
    where
        R: serde::de::DeserializeOwned,
        P: Serialize + std::fmt::Debug + ?Sized,
    {
        trace!("GET {} {:?}", route, params);
        self.octocrab.get(route, params).await
    }
}

#[async_trait]
impl GitHubClient for OctocrabClient {
    async fn list_workflows(&self, owner: &str, repo: &str) -> anyhow::Result<Vec<Workflow>> {
        debug!("Fetching workflows for {}/{}", owner, repo);

        let route = format!("/repos/{}/{}/actions/workflows", owner, repo);
        let page: WorkflowsPage = self
            .get_json(&route, Some(&PageQuery::first(100)))
            .await
            .with_context(|| format!("Failed to list workflows for {}/{}", owner, repo))?;

        let workflows: Vec<Workflow> = page.workflows.into_iter().map(convert_workflow).collect();

        debug!(
            "Fetched {} workflows for {}/{}",
            workflows.len(),
            owner,
            repo
        );
        Ok(workflows)
    }

    async fn latest_workflow_run(
        &self,
        owner: &str,
        repo: &str,
        workflow_id: u64,
    ) -> anyhow::Result<Option<WorkflowRun>> {
        debug!(
            "Fetching latest run of workflow {} for {}/{}",
            workflow_id, owner, repo
        );

        let route = format!(
            "/repos/{}/{}/actions/workflows/{}/runs",
            owner, repo, workflow_id
        );
        let page: RunsPage = self
            .get_json(&route, Some(&PageQuery::first(1)))
            .await
            .with_context(|| {
                format!(
                    "Failed to list runs of workflow {} for {}/{}",
                    workflow_id, owner, repo
                )
            })?;

        if page.total_count == 0 {
            debug!("Workflow {} has no runs", workflow_id);
            return Ok(None);
        }

        Ok(page.workflow_runs.into_iter().next().map(convert_run))
    }

    async fn workflow_run(
        &self,
        owner: &str,
        repo: &str,
        run_id: u64,
    ) -> anyhow::Result<WorkflowRun> {
        debug!("Fetching run {} for {}/{}", run_id, owner, repo);

        let route = format!("/repos/{}/{}/actions/runs/{}", owner, repo, run_id);
        let run: RunPayload = self
            .get_json(&route, None::<&()>)
            .await
            .with_context(|| format!("Failed to fetch run {} for {}/{}", run_id, owner, repo))?;

        Ok(convert_run(run))
    }

    async fn latest_job(
        &self,
        owner: &str,
        repo: &str,
        run_id: u64,
    ) -> anyhow::Result<Option<Job>> {
        debug!("Fetching latest job of run {} for {}/{}", run_id, owner, repo);

        let route = format!("/repos/{}/{}/actions/runs/{}/jobs", owner, repo, run_id);
        let query = JobsQuery {
            filter: "latest",
            per_page: 1,
            page: 1,
        };
        let page: JobsPage = self
            .get_json(&route, Some(&query))
            .await
            .with_context(|| {
                format!(
                    "Failed to list jobs of run {} for {}/{}",
                    run_id, owner, repo
                )
            })?;

        if page.total_count == 0 {
            return Ok(None);
        }

        Ok(page.jobs.into_iter().next().map(convert_job))
    }

    async fn list_open_pull_requests(
        &self,
        owner: &str,
        repo: &str,
        limit: u8,
    ) -> anyhow::Result<Vec<PullRequest>> {
        debug!("Fetching open PRs for {}/{}", owner, repo);

        let route = format!("/repos/{}/{}/pulls", owner, repo);
        let query = PullsQuery {
            state: "open",
            sort: "created",
            direction: "desc",
            per_page: limit,
            page: 1,
        };
        let pulls: Vec<PullPayload> = self
            .get_json(&route, Some(&query))
            .await
            .with_context(|| format!("Failed to list pull requests for {}/{}", owner, repo))?;

        let prs: Vec<PullRequest> = pulls.into_iter().map(convert_pull_request).collect();

        debug!("Fetched {} open PRs for {}/{}", prs.len(), owner, repo);
        Ok(prs)
    }
}

#[derive(Debug, Serialize)]
struct PageQuery {
    per_page: u8,
    page: u32,
}

impl PageQuery {
    fn first(per_page: u8) -> Self {
        Self { per_page, page: 1 }
    }
}

#[derive(Debug, Serialize)]
struct JobsQuery {
    filter: &'static str,
    per_page: u8,
    page: u32,
}

#[derive(Debug, Serialize)]
struct PullsQuery {
    state: &'static str,
    sort: &'static str,
    direction: &'static str,
    per_page: u8,
    page: u32,
}

#[derive(Debug, Deserialize)]
struct WorkflowsPage {
    #[serde(default)]
    workflows: Vec<WorkflowPayload>,
}

#[derive(Debug, Deserialize)]
struct WorkflowPayload {
    id: u64,
    name: String,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct RunsPage {
    total_count: u64,
    #[serde(default)]
    workflow_runs: Vec<RunPayload>,
}

#[derive(Debug, Deserialize)]
struct RunPayload {
    id: u64,
    #[serde(default)]
    display_title: String,
    status: Option<String>,
    conclusion: Option<String>,
    created_at: DateTime<Utc>,
    run_started_at: Option<DateTime<Utc>>,
    actor: Option<ActorPayload>,
}

#[derive(Debug, Deserialize)]
struct ActorPayload {
    login: String,
}

#[derive(Debug, Deserialize)]
struct JobsPage {
    total_count: u64,
    #[serde(default)]
    jobs: Vec<JobPayload>,
}

#[derive(Debug, Deserialize)]
struct JobPayload {
    status: String,
    conclusion: Option<String>,
    #[serde(default)]
    steps: Vec<StepPayload>,
}

#[derive(Debug, Deserialize)]
struct StepPayload {
    name: String,
    conclusion: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PullPayload {
    number: u64,
    title: Option<String>,
    state: String,
    created_at: DateTime<Utc>,
    html_url: Option<String>,
}

/// Convert a workflow payload to our Workflow type
fn convert_workflow(workflow: WorkflowPayload) -> Workflow {
    Workflow {
        id: workflow.id,
        name: workflow.name,
        updated_at: workflow.updated_at,
    }
}

/// Convert a run payload to our WorkflowRun type
fn convert_run(run: RunPayload) -> WorkflowRun {
    WorkflowRun {
        id: run.id,
        display_title: run.display_title,
        status: run.status.unwrap_or_default(),
        conclusion: run.conclusion,
        // GitHub leaves run_started_at empty for runs that never started
        run_started_at: run.run_started_at.unwrap_or(run.created_at),
        created_at: run.created_at,
        actor: run
            .actor
            .map(|a| a.login)
            .unwrap_or_else(|| "unknown".to_string()),
    }
}

/// Convert a job payload to our Job type
fn convert_job(job: JobPayload) -> Job {
    Job {
        status: job.status,
        conclusion: job.conclusion,
        steps: job
            .steps
            .into_iter()
            .map(|step| Step {
                name: step.name,
                conclusion: step.conclusion,
            })
            .collect(),
    }
}

/// Convert a pull request payload to our PullRequest type
fn convert_pull_request(pr: PullPayload) -> PullRequest {
    PullRequest {
        number: pr.number,
        title: pr.title.unwrap_or_default(),
        state: pr.state,
        created_at: pr.created_at,
        html_url: pr.html_url.unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_runs_page() {
        let json = r#"{
            "total_count": 12,
            "workflow_runs": [{
                "id": 9001,
                "name": "cd",
                "display_title": "Release v1.2.3",
                "status": "in_progress",
                "conclusion": null,
                "created_at": "2024-03-01T10:00:00Z",
                "run_started_at": "2024-03-01T10:00:05Z",
                "actor": { "login": "octocat", "id": 1 }
            }]
        }"#;

        let page: RunsPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.total_count, 12);

        let run = convert_run(page.workflow_runs.into_iter().next().unwrap());
        assert_eq!(run.id, 9001);
        assert_eq!(run.display_title, "Release v1.2.3");
        assert_eq!(run.status, "in_progress");
        assert_eq!(run.conclusion, None);
        assert_eq!(run.actor, "octocat");
        assert_eq!(run.run_started_at.to_rfc3339(), "2024-03-01T10:00:05+00:00");
    }

    #[test]
    fn test_convert_run_without_start_or_actor() {
        let json = r#"{
            "id": 1,
            "display_title": "Queued",
            "status": "queued",
            "conclusion": null,
            "created_at": "2024-03-01T10:00:00Z",
            "run_started_at": null,
            "actor": null
        }"#;

        let run = convert_run(serde_json::from_str(json).unwrap());
        assert_eq!(run.run_started_at, run.created_at);
        assert_eq!(run.actor, "unknown");
    }

    #[test]
    fn test_convert_jobs_page() {
        let json = r#"{
            "total_count": 1,
            "jobs": [{
                "id": 55,
                "status": "in_progress",
                "conclusion": null,
                "steps": [
                    { "name": "Set up job", "status": "completed", "conclusion": "success", "number": 1 },
                    { "name": "Deploy", "status": "in_progress", "conclusion": null, "number": 2 }
                ]
            }]
        }"#;

        let page: JobsPage = serde_json::from_str(json).unwrap();
        let job = convert_job(page.jobs.into_iter().next().unwrap());

        assert_eq!(job.status, "in_progress");
        assert_eq!(job.conclusion, None);
        assert_eq!(job.steps.len(), 2);
        assert_eq!(job.steps[0].conclusion.as_deref(), Some("success"));
        assert_eq!(job.steps[1].name, "Deploy");
        assert_eq!(job.steps[1].conclusion, None);
    }

    #[test]
    fn test_convert_job_without_steps() {
        let json = r#"{ "total_count": 1, "jobs": [{ "status": "queued", "conclusion": null }] }"#;

        let page: JobsPage = serde_json::from_str(json).unwrap();
        let job = convert_job(page.jobs.into_iter().next().unwrap());

        assert_eq!(job.status, crate::types::STATUS_QUEUED);
        assert!(job.steps.is_empty());
    }

    #[test]
    fn test_convert_pull_request() {
        let json = r#"[{
            "number": 314,
            "title": "svc: production deploy",
            "state": "open",
            "created_at": "2024-03-01T11:00:00Z",
            "html_url": "https://github.com/acme/infrastructure/pull/314"
        }, {
            "number": 315,
            "title": null,
            "state": "open",
            "created_at": "2024-03-01T12:00:00Z",
            "html_url": null
        }]"#;

        let pulls: Vec<PullPayload> = serde_json::from_str(json).unwrap();
        let prs: Vec<PullRequest> = pulls.into_iter().map(convert_pull_request).collect();

        assert_eq!(prs[0].number, 314);
        assert_eq!(prs[0].title, "svc: production deploy");
        assert_eq!(prs[1].title, "");
        assert_eq!(prs[1].html_url, "");
    }

    #[test]
    fn test_query_serialization() {
        let query = PullsQuery {
            state: "open",
            sort: "created",
            direction: "desc",
            per_page: 10,
            page: 1,
        };
        let value = serde_json::to_value(&query).unwrap();

        assert_eq!(value["state"], "open");
        assert_eq!(value["sort"], "created");
        assert_eq!(value["direction"], "desc");
        assert_eq!(value["per_page"], 10);
    }
}
