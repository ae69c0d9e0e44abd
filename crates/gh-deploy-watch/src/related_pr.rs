//! Related infrastructure PR detection
//!
//! A finished deployment of `<repo>` is usually followed by a pull request
//! in the infrastructure repository promoting the same change to
//! production. We look for it among the newest open PRs and announce it.
//! Nothing is merged.

use gh_client::{GitHubClient, PullRequest, WorkflowRun};
use tokio::time::sleep;

use crate::config::WatchConfig;
use crate::error::WatchError;
use crate::reporter::{ProgressEvent, ProgressReporter};

/// Pick the PR whose title mentions the repository, the run and the marker
///
/// When several PRs match, the last one in list order is returned.
pub fn find_related_pr<'a>(
    candidates: &'a [PullRequest],
    repo: &str,
    run_title: &str,
    marker: &str,
) -> Option<&'a PullRequest> {
    candidates
        .iter()
        .filter(|pr| {
            pr.title.contains(repo) && pr.title.contains(run_title) && pr.title.contains(marker)
        })
        .last()
}

/// Search the companion repository for a PR following `run` and count down
///
/// Only meaningful for the continuous deployment workflow; the caller
/// decides whether to invoke it.
pub async fn announce_related_pr<C, R>(
    client: &C,
    config: &WatchConfig,
    run: &WorkflowRun,
    reporter: &mut R,
) -> Result<Option<PullRequest>, WatchError>
where
    C: GitHubClient + ?Sized,
    R: ProgressReporter + ?Sized,
{
    let settings = &config.settings;
    let candidates = client
        .list_open_pull_requests(
            &config.owner,
            &settings.companion_repo,
            settings.pr_candidates,
        )
        .await?;

    let Some(pr) = find_related_pr(
        &candidates,
        &config.repo,
        &run.display_title,
        &settings.production_marker,
    ) else {
        log::info!(
            "No open {} PR matches run '{}' among {} candidates",
            settings.companion_repo,
            run.display_title,
            candidates.len()
        );
        return Ok(None);
    };

    log::info!("Found related PR #{}: {}", pr.number, pr.title);
    for remaining in (1..=settings.countdown).rev() {
        reporter.report(ProgressEvent::Countdown {
            pr_title: pr.title.clone(),
            remaining,
            message: countdown_message(config, &pr.title, remaining),
        })?;
        sleep(settings.countdown_tick).await;
    }

    Ok(Some(pr.clone()))
}

/// Status line announcing the PR, e.g.
/// `Workflow 'cd' run for acme/svc: Found open infra PR: <title>, merging in 3...`
pub fn countdown_message(config: &WatchConfig, pr_title: &str, remaining: u32) -> String {
    config.stage_message(&format!(
        "Found open infra PR: {pr_title}, merging in {remaining}..."
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WatchSettings;
    use chrono::Utc;

    fn pr(number: u64, title: &str) -> PullRequest {
        PullRequest {
            number,
            title: title.to_string(),
            state: "open".to_string(),
            created_at: Utc::now(),
            html_url: format!("https://github.com/acme/infrastructure/pull/{number}"),
        }
    }

    #[test]
    fn test_last_match_wins() {
        let candidates = vec![
            pr(1, "svc: production deploy (run A)"),
            pr(2, "svc: production deploy (run A) v2"),
        ];

        let found = find_related_pr(&candidates, "svc", "run A", "production").unwrap();
        assert_eq!(found.number, 2);
    }

    #[test]
    fn test_all_three_tokens_required() {
        let candidates = vec![
            pr(1, "svc: staging deploy (run A)"),
            pr(2, "other: production deploy (run A)"),
            pr(3, "svc: production deploy (run B)"),
        ];

        assert!(find_related_pr(&candidates, "svc", "run A", "production").is_none());
    }

    #[test]
    fn test_match_is_case_sensitive_substring() {
        let candidates = vec![pr(1, "Deploy SVC to Production: run A")];

        assert!(find_related_pr(&candidates, "svc", "run A", "production").is_none());
        assert!(find_related_pr(&candidates, "SVC", "run A", "Production").is_some());
    }

    #[test]
    fn test_non_matching_entries_do_not_reset_match() {
        let candidates = vec![
            pr(1, "unrelated"),
            pr(2, "svc production run A"),
            pr(3, "also unrelated"),
        ];

        let found = find_related_pr(&candidates, "svc", "run A", "production").unwrap();
        assert_eq!(found.number, 2);
    }

    #[test]
    fn test_countdown_message_uses_stage_prefix() {
        let config = WatchConfig::new("acme", "svc", "cd", WatchSettings::default());
        assert_eq!(
            countdown_message(&config, "svc production", 3),
            "Workflow 'cd' run for acme/svc: Found open infra PR: svc production, merging in 3..."
        );
    }

    #[test]
    fn test_no_candidates() {
        assert!(find_related_pr(&[], "svc", "run A", "production").is_none());
    }
}
