//! Repository discovery from the local git checkout
//!
//! When no repository is given on the command line, the watcher looks at
//! `remote.origin.url` of the current directory and uses its owner and name.

use std::process::Command;

/// Owner and name of a GitHub repository taken from a git remote URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRepository {
    pub owner: String,
    pub repo: String,
}

/// Read `remote.origin.url` of the current directory
///
/// Returns `None` when git is not installed, the directory is not a
/// checkout, there is no `origin` remote, or its URL has an unexpected shape.
pub fn origin_remote() -> Option<RemoteRepository> {
    let output = Command::new("git")
        .args(["config", "--get", "remote.origin.url"])
        .output()
        .map_err(|e| log::debug!("Failed to run git: {}", e))
        .ok()?;

    if !output.status.success() {
        log::debug!("No origin remote configured");
        return None;
    }

    let url = String::from_utf8_lossy(&output.stdout);
    let remote = parse_remote_url(&url);
    log::debug!("origin remote {:?} parsed as {:?}", url.trim(), remote);
    remote
}

/// Parse `owner/repo` out of an SSH or HTTPS remote URL
///
/// Accepted forms:
/// - `git@github.com:owner/repo.git`
/// - `ssh://git@github.com/owner/repo.git`
/// - `https://github.com/owner/repo(.git)`
pub fn parse_remote_url(url: &str) -> Option<RemoteRepository> {
    let url = url.trim();

    let path = match url.split_once("://") {
        Some((_scheme, rest)) => rest.split_once('/')?.1,
        None => url.split_once(':')?.1,
    };

    let path = path.trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);

    let segments: Vec<&str> = path.split('/').collect();
    match segments.as_slice() {
        [owner, repo] if !owner.is_empty() && !repo.is_empty() => Some(RemoteRepository {
            owner: owner.to_string(),
            repo: repo.to_string(),
        }),
        _ => None,
    }
}
