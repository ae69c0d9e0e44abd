//! Token lookup and octocrab construction
//!
//! The watcher does not implement any authentication flow. It reads a
//! personal access token from the environment and hands it to octocrab.
//! A missing token is not an error here: the first authenticated request
//! fails instead and reports the problem.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use octocrab::Octocrab;

/// Environment variable holding the GitHub token
pub const DEFAULT_TOKEN_ENV: &str = "GH_ACCESS_TOKEN";

/// Resolves the GitHub token from an environment variable
#[derive(Debug, Clone)]
pub struct TokenResolver {
    env_var: String,
}

impl Default for TokenResolver {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_ENV)
    }
}

impl TokenResolver {
    /// Create a resolver reading the given environment variable
    pub fn new(env_var: impl Into<String>) -> Self {
        Self {
            env_var: env_var.into(),
        }
    }

    /// Read the token, treating an empty value as absent
    pub fn resolve(&self) -> Option<String> {
        match std::env::var(&self.env_var) {
            Ok(token) if !token.trim().is_empty() => {
                debug!("Using token from env var {}", self.env_var);
                Some(token.trim().to_string())
            }
            _ => {
                warn!(
                    "{} is not set, requests will be unauthenticated",
                    self.env_var
                );
                None
            }
        }
    }
}

/// Build an octocrab instance for github.com
pub fn build_octocrab(token: Option<String>) -> Result<Octocrab> {
    let mut builder = Octocrab::builder();
    if let Some(token) = token {
        builder = builder.personal_token(token);
    }

    let octocrab = builder.build().context("Failed to build Octocrab client")?;
    info!("GitHub client created for host: {}", crate::DEFAULT_HOST);
    Ok(octocrab)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_resolver_reads_access_token_var() {
        assert_eq!(TokenResolver::default().env_var, "GH_ACCESS_TOKEN");
    }

    #[test]
    fn test_resolve_trims_and_ignores_blank_values() {
        // Unique names so parallel tests do not race on the same variable
        let present = "GH_DEPLOY_WATCH_TEST_TOKEN_PRESENT";
        let blank = "GH_DEPLOY_WATCH_TEST_TOKEN_BLANK";
        let missing = "GH_DEPLOY_WATCH_TEST_TOKEN_MISSING";

        std::env::set_var(present, "  ghp_secret \n");
        std::env::set_var(blank, "   ");
        std::env::remove_var(missing);

        assert_eq!(
            TokenResolver::new(present).resolve().as_deref(),
            Some("ghp_secret")
        );
        assert_eq!(TokenResolver::new(blank).resolve(), None);
        assert_eq!(TokenResolver::new(missing).resolve(), None);
    }

    #[tokio::test]
    async fn test_build_octocrab_without_token() {
        // octocrab needs a runtime for its http client
        assert!(build_octocrab(None).is_ok());
    }
}
