use clap::Parser;
use gh_deploy_config::{AppConfig, RemoteRepository};

/// Follow the latest GitHub Actions run of a workflow until it concludes
#[derive(Debug, Parser)]
#[command(name = "gh-deploy-watch", version, about)]
pub struct Cli {
    /// Workflow name, matched case-insensitively [default: from config, else "cd"]
    #[arg(short, long)]
    pub workflow: Option<String>,

    /// Repository name [default: from `remote.origin.url`]
    #[arg(short, long)]
    pub repo: Option<String>,

    /// Repository owner [default: from config, else "ubio"]
    #[arg(short, long)]
    pub owner: Option<String>,

    /// Trace every GitHub request in the log file
    #[arg(long)]
    pub debug: bool,
}

/// Repository to watch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub owner: String,
    pub repo: String,
    pub workflow: String,
}

impl Cli {
    /// Combine flags, config file and git remote into a target
    ///
    /// An explicit `--repo` is paired with `--owner` or the configured owner.
    /// A repository taken from the git remote brings its own owner, unless
    /// `--owner` was given. Returns `None` when no repository is known.
    pub fn resolve_target(
        &self,
        config: &AppConfig,
        remote: Option<RemoteRepository>,
    ) -> Option<Target> {
        let workflow = self
            .workflow
            .clone()
            .unwrap_or_else(|| config.workflow.clone());

        let (remote_owner, repo) = match (&self.repo, remote) {
            (Some(repo), _) if !repo.trim().is_empty() => (None, repo.trim().to_string()),
            (_, Some(remote)) => (Some(remote.owner), remote.repo),
            _ => return None,
        };

        let owner = self
            .owner
            .clone()
            .or(remote_owner)
            .unwrap_or_else(|| config.owner.clone());

        Some(Target {
            owner,
            repo,
            workflow,
        })
    }
}
