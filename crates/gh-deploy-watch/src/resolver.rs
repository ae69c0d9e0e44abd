//! Workflow lookup by human-supplied name

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use gh_client::Workflow;

use crate::error::WatchError;

/// A known workflow offered to the operator when the name did not match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowCandidate {
    pub workflow: Workflow,
    /// Time since the workflow definition was last updated, e.g. "3 days ago"
    pub since_update: String,
}

impl fmt::Display for WorkflowCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " - {}, {}", self.workflow.name, self.since_update)
    }
}

/// Find the workflow whose name equals `name`, ignoring case
///
/// The first match in listing order wins. Without a match the error carries
/// every workflow, in listing order, with its age relative to `now`.
pub fn resolve_workflow<'a>(
    workflows: &'a [Workflow],
    name: &str,
    now: DateTime<Utc>,
) -> Result<&'a Workflow, WatchError> {
    let wanted = name.to_lowercase();
    if let Some(workflow) = workflows.iter().find(|w| w.name.to_lowercase() == wanted) {
        log::debug!("Workflow '{}' resolved to id {}", name, workflow.id);
        return Ok(workflow);
    }

    log::info!(
        "No workflow named '{}' among {} workflows",
        name,
        workflows.len()
    );
    Err(WatchError::WorkflowNotFound {
        name: name.to_string(),
        candidates: workflows
            .iter()
            .map(|workflow| WorkflowCandidate {
                since_update: time_since(workflow.updated_at, now),
                workflow: workflow.clone(),
            })
            .collect(),
    })
}

/// Human readable age of `then`, rounded to the hour
fn time_since(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours = ((now - then).num_minutes() as f64 / 60.0).round() as i64;
    match TimeDelta::hours(hours.max(0)).to_std() {
        Ok(duration) => timeago::Formatter::new().convert(duration),
        Err(_) => "[out of range]".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn workflow(id: u64, name: &str, updated_at: DateTime<Utc>) -> Workflow {
        Workflow {
            id,
            name: name.to_string(),
            updated_at,
        }
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let now = Utc::now();
        let workflows = vec![workflow(1, "CI", now), workflow(42, "CD", now)];

        let found = resolve_workflow(&workflows, "cd", now).unwrap();
        assert_eq!(found.id, 42);

        let found = resolve_workflow(&workflows, "Ci", now).unwrap();
        assert_eq!(found.id, 1);
    }

    #[test]
    fn test_resolve_first_match_wins() {
        let now = Utc::now();
        let workflows = vec![workflow(7, "deploy", now), workflow(8, "Deploy", now)];

        assert_eq!(resolve_workflow(&workflows, "DEPLOY", now).unwrap().id, 7);
    }

    #[test]
    fn test_resolve_requires_exact_name() {
        let now = Utc::now();
        let workflows = vec![workflow(1, "cd-staging", now)];

        assert!(resolve_workflow(&workflows, "cd", now).is_err());
    }

    #[test]
    fn test_not_found_lists_every_workflow() {
        let now = Utc::now();
        let workflows = vec![
            workflow(1, "CI", now - TimeDelta::hours(5)),
            workflow(2, "Nightly", now - TimeDelta::days(3)),
        ];

        let err = resolve_workflow(&workflows, "cd", now).unwrap_err();
        let WatchError::WorkflowNotFound { name, candidates } = err else {
            panic!("expected WorkflowNotFound");
        };

        assert_eq!(name, "cd");
        let listed: Vec<Workflow> = candidates.iter().map(|c| c.workflow.clone()).collect();
        assert_eq!(listed, workflows);
        assert_eq!(candidates[0].since_update, "5 hours ago");
        assert_eq!(candidates[1].since_update, "3 days ago");
        assert_eq!(candidates[0].to_string(), " - CI, 5 hours ago");
    }

    #[test]
    fn test_not_found_with_no_workflows() {
        let err = resolve_workflow(&[], "cd", Utc::now()).unwrap_err();
        assert!(matches!(
            err,
            WatchError::WorkflowNotFound { ref candidates, .. } if candidates.is_empty()
        ));
    }
}
