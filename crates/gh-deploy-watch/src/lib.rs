//! Follow a GitHub Actions deployment run from the terminal
//!
//! The pipeline resolves a workflow by name, picks its latest run, tracks
//! the run's job step by step while it is active, waits for the run's
//! conclusion and finally looks for a related infrastructure PR.
//!
//! All output goes through a [`ProgressReporter`], so the pipeline runs
//! the same against a terminal and in tests.

pub mod completion;
pub mod config;
pub mod error;
pub mod plain;
pub mod progress;
pub mod related_pr;
pub mod reporter;
pub mod resolver;
pub mod terminal;
pub mod tracker;
pub mod watch;

pub use completion::{Backoff, await_conclusion};
pub use config::{WatchConfig, WatchSettings};
pub use error::WatchError;
pub use plain::PlainReporter;
pub use progress::{ActiveRunDetails, JobPhase};
pub use related_pr::{announce_related_pr, countdown_message, find_related_pr};
pub use reporter::{ProgressEvent, ProgressReporter, RecordingReporter, RunIcon, RunSummary};
pub use resolver::{WorkflowCandidate, resolve_workflow};
pub use terminal::TerminalReporter;
pub use tracker::track_active_run;
pub use watch::{WatchOutcome, watch};
