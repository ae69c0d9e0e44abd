//! Step-level progress of an active run
//!
//! [`ActiveRunDetails::reduce`] turns one job snapshot into the progress the
//! operator sees. It is a pure function of the snapshot: nothing from an
//! earlier poll leaks into the result.

use gh_client::Job;
use gh_client::types::STATUS_QUEUED;

/// Progress of the latest job of a run, as of one poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveRunDetails {
    /// Number of steps the job currently plans
    pub total: usize,
    /// 1-based index of the first unfinished step, 0 when none is pending
    ///
    /// Once the job itself has concluded this is `total` instead, so the
    /// finished bar renders full.
    pub current: usize,
    /// Name of the step at `current`, empty when none is pending
    pub step_name: String,
    /// The job itself has concluded
    pub is_done: bool,
    /// Raw job status
    pub status: String,
}

/// Coarse state of the tracked job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPhase {
    Queued,
    Running,
    Done,
}

impl ActiveRunDetails {
    /// Progress shown before the first job snapshot arrives
    pub fn initial() -> Self {
        Self {
            total: 1,
            current: 0,
            step_name: String::new(),
            is_done: false,
            status: String::new(),
        }
    }

    /// Reduce a job snapshot
    pub fn reduce(job: &Job) -> Self {
        let total = job.steps.len();

        if job.conclusion.is_some() {
            return Self {
                total,
                current: total,
                step_name: String::new(),
                is_done: true,
                status: job.status.clone(),
            };
        }

        let (current, step_name) = job
            .steps
            .iter()
            .position(|step| step.conclusion.is_none())
            .map(|index| (index + 1, job.steps[index].name.clone()))
            .unwrap_or_default();

        Self {
            total,
            current,
            step_name,
            is_done: false,
            status: job.status.clone(),
        }
    }

    pub fn phase(&self) -> JobPhase {
        if self.is_done {
            JobPhase::Done
        } else if self.status == STATUS_QUEUED {
            JobPhase::Queued
        } else {
            JobPhase::Running
        }
    }
}
