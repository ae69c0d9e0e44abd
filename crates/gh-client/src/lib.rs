//! GitHub API client for watching Actions workflow runs
//!
//! This crate provides a trait-based, read-only GitHub API client covering
//! the handful of endpoints needed to follow a deployment: workflows, their
//! runs, the jobs of a run, and open pull requests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              GitHubClient trait                  │
//! │  - list_workflows()                              │
//! │  - latest_workflow_run() / workflow_run()        │
//! │  - latest_job()                                  │
//! │  - list_open_pull_requests()                     │
//! └─────────────────────────────────────────────────┘
//!                        │
//!                        ▼
//!              ┌─────────────────┐
//!              │ OctocrabClient  │
//!              │ (direct API)    │
//!              └─────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use gh_client::{GitHubClient, OctocrabClient, TokenResolver};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let token = TokenResolver::default().resolve();
//! let octocrab = gh_client::build_octocrab(token)?;
//! let client = OctocrabClient::new(Arc::new(octocrab));
//!
//! let workflows = client.list_workflows("owner", "repo").await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod octocrab_client;
pub mod types;

/// Default GitHub host (public GitHub)
pub const DEFAULT_HOST: &str = "github.com";

pub use auth::{build_octocrab, TokenResolver, DEFAULT_TOKEN_ENV};
pub use client::GitHubClient;
pub use octocrab_client::OctocrabClient;
pub use types::{Job, PullRequest, Step, Workflow, WorkflowRun};
