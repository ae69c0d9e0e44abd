//! Line-by-line rendering for non-interactive output
//!
//! Used when stdout is not a terminal (pipes, CI logs). Nothing is ever
//! overwritten: every change of stage or step is printed as a new line.

use std::io::{self, Write};

use chrono::{DateTime, Utc};

use crate::progress::ActiveRunDetails;
use crate::reporter::{ProgressEvent, ProgressReporter, bar_prefix};

/// Prints progress events as plain lines
pub struct PlainReporter<W: Write> {
    out: W,
    last_line: String,
    started_at: Option<DateTime<Utc>>,
    last_step: Option<(usize, String)>,
}

impl<W: Write> PlainReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_line: String::new(),
            started_at: None,
            last_step: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: String) -> io::Result<()> {
        if text == self.last_line {
            return Ok(());
        }
        writeln!(self.out, "{text}")?;
        self.out.flush()?;
        self.last_line = text;
        Ok(())
    }

    fn step(&mut self, details: &ActiveRunDetails) -> io::Result<()> {
        let step = (details.current, details.step_name.clone());
        if self.last_step.as_ref() == Some(&step) {
            return Ok(());
        }
        self.last_step = Some(step);
        let prefix = self.prefix(details);
        self.line(prefix.trim_end().to_string())
    }

    fn prefix(&self, details: &ActiveRunDetails) -> String {
        let elapsed = self
            .started_at
            .and_then(|started| (Utc::now() - started).to_std().ok())
            .unwrap_or_default();
        bar_prefix(details, elapsed)
    }
}

impl<W: Write> ProgressReporter for PlainReporter<W> {
    fn report(&mut self, event: ProgressEvent) -> io::Result<()> {
        match event {
            ProgressEvent::Stage(message) => self.line(message),
            ProgressEvent::Queued(_) => {
                self.last_step = None;
                Ok(())
            }
            ProgressEvent::BarCreated {
                details,
                started_at,
            } => {
                self.started_at = Some(started_at);
                self.last_step = None;
                self.step(&details)
            }
            ProgressEvent::BarUpdated(details) => self.step(&details),
            ProgressEvent::BarFinished(details) => {
                let line = format!("{} done", self.prefix(&details).trim_end());
                self.last_step = None;
                self.line(line)
            }
            ProgressEvent::Summary(summary) => self.line(summary.to_string()),
            ProgressEvent::Countdown { message, .. } => self.line(message),
        }
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
