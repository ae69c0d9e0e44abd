//! Application configuration
//!
//! Configuration loaded from `.gh-deploy-watch.toml`. Every key is optional;
//! command line flags override the values for a single invocation.

use serde::{Deserialize, Serialize};

/// Application configuration loaded from .gh-deploy-watch.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Repository owner used when neither a flag nor the git remote names one
    #[serde(default = "default_owner")]
    pub owner: String,

    /// Workflow to watch when `--workflow` is not given
    #[serde(default = "default_workflow")]
    pub workflow: String,

    /// Name of the continuous deployment workflow that triggers PR matching
    #[serde(default = "default_cd_workflow")]
    pub cd_workflow: String,

    /// Repository (same owner) holding the infrastructure pull requests
    #[serde(default = "default_companion_repo")]
    pub companion_repo: String,

    /// Token a matching infrastructure PR title must contain
    #[serde(default = "default_production_marker")]
    pub production_marker: String,

    /// Seconds between job polls while a run is active
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Number of open infrastructure PRs inspected (one page)
    #[serde(default = "default_pr_candidates")]
    pub pr_candidates: u8,

    /// Length of the countdown announcing a matched PR
    #[serde(default = "default_countdown_secs")]
    pub countdown_secs: u32,

    /// Upper bound on waiting for a finished run to report its conclusion
    #[serde(default = "default_conclusion_timeout_secs")]
    pub conclusion_timeout_secs: u64,

    /// Optional upper bound on tracking an active run; unbounded when absent
    #[serde(default)]
    pub track_timeout_secs: Option<u64>,

    /// Environment variable holding the GitHub token
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

fn default_owner() -> String {
    "ubio".to_string()
}

fn default_workflow() -> String {
    "cd".to_string()
}

fn default_cd_workflow() -> String {
    "cd".to_string()
}

fn default_companion_repo() -> String {
    "infrastructure".to_string()
}

fn default_production_marker() -> String {
    "production".to_string()
}

fn default_poll_interval_secs() -> u64 {
    1
}

fn default_pr_candidates() -> u8 {
    10
}

fn default_countdown_secs() -> u32 {
    5
}

fn default_conclusion_timeout_secs() -> u64 {
    300
}

fn default_token_env() -> String {
    "GH_ACCESS_TOKEN".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            owner: default_owner(),
            workflow: default_workflow(),
            cd_workflow: default_cd_workflow(),
            companion_repo: default_companion_repo(),
            production_marker: default_production_marker(),
            poll_interval_secs: default_poll_interval_secs(),
            pr_candidates: default_pr_candidates(),
            countdown_secs: default_countdown_secs(),
            conclusion_timeout_secs: default_conclusion_timeout_secs(),
            track_timeout_secs: None,
            token_env: default_token_env(),
        }
    }
}

impl AppConfig {
    /// Load the first config file found, or use defaults
    ///
    /// A file that fails to parse is logged and ignored.
    pub fn load() -> Self {
        if let Some(source) = crate::load_config_file() {
            match Self::parse(&source.content) {
                Ok(config) => {
                    log::info!("Loaded app config from {}", source.path.display());
                    return config;
                }
                Err(e) => {
                    log::warn!("Ignoring {}: {}", source.path.display(), e);
                }
            }
        }

        log::debug!("Using default app config");
        Self::default()
    }

    /// Parse config file content
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.owner, "ubio");
        assert_eq!(config.workflow, "cd");
        assert_eq!(config.cd_workflow, "cd");
        assert_eq!(config.companion_repo, "infrastructure");
        assert_eq!(config.production_marker, "production");
        assert_eq!(config.poll_interval_secs, 1);
        assert_eq!(config.pr_candidates, 10);
        assert_eq!(config.countdown_secs, 5);
        assert_eq!(config.track_timeout_secs, None);
        assert_eq!(config.token_env, "GH_ACCESS_TOKEN");
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_config_deserialize_partial() {
        let toml = r#"
            owner = "acme"
            companion_repo = "platform"
            track_timeout_secs = 1800
        "#;
        let config = AppConfig::parse(toml).unwrap();
        assert_eq!(config.owner, "acme");
        assert_eq!(config.companion_repo, "platform");
        assert_eq!(config.track_timeout_secs, Some(1800));
        // Other fields should use defaults
        assert_eq!(config.workflow, "cd");
        assert_eq!(config.conclusion_timeout_secs, 300);
    }

    #[test]
    fn test_config_rejects_wrong_types() {
        assert!(AppConfig::parse("poll_interval_secs = \"fast\"").is_err());
    }
}
