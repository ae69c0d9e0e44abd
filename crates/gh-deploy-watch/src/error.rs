//! Errors of the watch pipeline

use std::time::Duration;
use thiserror::Error;

use crate::resolver::WorkflowCandidate;

/// Errors that can stop a watch
///
/// Only [`WatchError::WorkflowNotFound`] is meant to be handled by the
/// caller; everything else ends the process.
#[derive(Error, Debug)]
pub enum WatchError {
    /// No workflow carries the requested name
    #[error("Unable to find workflow matching '{name}'")]
    WorkflowNotFound {
        name: String,
        /// Every known workflow, for the operator to pick from
        candidates: Vec<WorkflowCandidate>,
    },

    /// The workflow exists but never ran
    #[error("No workflow runs found for workflow {workflow_id}")]
    NoRunsFound { workflow_id: u64 },

    /// The active run was not done before the tracking deadline
    #[error("Run {run_id} was still active after {waited:?}")]
    TrackingTimeout { run_id: u64, waited: Duration },

    /// The finished run never reported a conclusion
    #[error("Run {run_id} did not report a conclusion within {waited:?}")]
    ConclusionTimeout { run_id: u64, waited: Duration },

    /// Transport or API failure from GitHub
    #[error(transparent)]
    Api(#[from] anyhow::Error),

    /// The progress reporter could not write to the terminal
    #[error("Failed to render progress: {0}")]
    Reporter(#[from] std::io::Error),
}

impl WatchError {
    /// Whether the error should terminate the process with a failure status
    pub fn is_fatal(&self) -> bool {
        !matches!(self, WatchError::WorkflowNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_missing_workflow_is_recoverable() {
        let not_found = WatchError::WorkflowNotFound {
            name: "cd".to_string(),
            candidates: vec![],
        };
        assert!(!not_found.is_fatal());
        assert_eq!(not_found.to_string(), "Unable to find workflow matching 'cd'");

        assert!(WatchError::NoRunsFound { workflow_id: 42 }.is_fatal());
        assert!(WatchError::Api(anyhow::anyhow!("boom")).is_fatal());
        assert!(
            WatchError::ConclusionTimeout {
                run_id: 1,
                waited: Duration::from_secs(300),
            }
            .is_fatal()
        );
    }

    #[test]
    fn test_api_error_keeps_context() {
        let err: WatchError = anyhow::anyhow!("401 Bad credentials")
            .context("Failed to list workflows for acme/svc")
            .into();

        assert_eq!(err.to_string(), "Failed to list workflows for acme/svc");
    }
}
