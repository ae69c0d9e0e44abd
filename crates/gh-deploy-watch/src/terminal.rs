//! Terminal rendering of progress events
//!
//! Uses a two-row inline viewport below the shell prompt: the first row is
//! the overwritable status line, the second the progress bar of a running
//! job. Finalized lines (finished bar, run summary) are pushed above the
//! viewport and stay in the scrollback.

use std::io::{self, Stdout};
use std::time::Duration;

use chrono::{DateTime, Utc};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Gauge, Paragraph, Widget};
use ratatui::{Terminal, TerminalOptions, Viewport};

use crate::progress::ActiveRunDetails;
use crate::reporter::{ProgressEvent, ProgressReporter, bar_prefix};

const VIEWPORT_HEIGHT: u16 = 2;

struct ActiveBar {
    details: ActiveRunDetails,
    started_at: DateTime<Utc>,
}

impl ActiveBar {
    fn prefix(&self) -> String {
        bar_prefix(&self.details, elapsed_since(self.started_at))
    }
}

/// Renders progress events in an inline terminal viewport
pub struct TerminalReporter<B: Backend> {
    terminal: Terminal<B>,
    live: String,
    bar: Option<ActiveBar>,
}

impl TerminalReporter<CrosstermBackend<Stdout>> {
    pub fn stdout() -> io::Result<Self> {
        Self::new(CrosstermBackend::new(io::stdout()))
    }
}

impl<B: Backend> TerminalReporter<B> {
    pub fn new(backend: B) -> io::Result<Self> {
        let terminal = Terminal::with_options(
            backend,
            TerminalOptions {
                viewport: Viewport::Inline(VIEWPORT_HEIGHT),
            },
        )?;
        Ok(Self {
            terminal,
            live: String::new(),
            bar: None,
        })
    }

    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }

    fn push_line(&mut self, text: String) -> io::Result<()> {
        self.terminal.insert_before(1, |buf| {
            Paragraph::new(Line::raw(text)).render(buf.area, buf);
        })
    }

    fn redraw(&mut self) -> io::Result<()> {
        let live = self.live.clone();
        let bar = self.bar.as_ref().map(|bar| (bar.prefix(), ratio(&bar.details)));

        self.terminal.draw(|frame| {
            let [status_row, bar_row] =
                Layout::vertical([Constraint::Length(1), Constraint::Length(1)])
                    .areas(frame.area());
            frame.render_widget(Paragraph::new(Line::raw(live)), status_row);
            if let Some((prefix, ratio)) = bar {
                render_bar(prefix, ratio, bar_row, frame.buffer_mut());
            }
        })?;
        Ok(())
    }
}

impl<B: Backend> ProgressReporter for TerminalReporter<B> {
    fn report(&mut self, event: ProgressEvent) -> io::Result<()> {
        match event {
            ProgressEvent::Stage(message) => self.live = message,
            ProgressEvent::Queued(_) => self.bar = None,
            ProgressEvent::BarCreated {
                details,
                started_at,
            } => {
                self.bar = Some(ActiveBar {
                    details,
                    started_at,
                })
            }
            ProgressEvent::BarUpdated(details) => {
                if let Some(bar) = self.bar.as_mut() {
                    bar.details = details;
                }
            }
            ProgressEvent::BarFinished(details) => {
                if let Some(mut bar) = self.bar.take() {
                    bar.details = details;
                    self.push_line(format!("{} done", bar.prefix()))?;
                }
            }
            ProgressEvent::Summary(summary) => {
                self.live.clear();
                self.push_line(summary.to_string())?;
            }
            ProgressEvent::Countdown { message, .. } => self.live = message,
        }
        self.redraw()
    }

    /// Keep the status line in the scrollback and release the viewport
    fn finish(&mut self) -> io::Result<()> {
        if let Some(bar) = self.bar.take() {
            let line = bar.prefix();
            self.push_line(line)?;
        }
        if !self.live.is_empty() {
            let line = std::mem::take(&mut self.live);
            self.push_line(line)?;
        }
        self.terminal.clear()
    }
}

fn render_bar(prefix: String, ratio: f64, area: Rect, buf: &mut Buffer) {
    let width = prefix.chars().count() as u16;
    let [label, gauge] =
        Layout::horizontal([Constraint::Length(width), Constraint::Min(0)]).areas(area);
    Paragraph::new(Line::raw(prefix)).render(label, buf);
    Gauge::default()
        .gauge_style(Style::default().fg(Color::Green).bg(Color::DarkGray))
        .label("")
        .ratio(ratio)
        .render(gauge, buf);
}

/// Filled share of the bar, always within `0.0..=1.0`
fn ratio(details: &ActiveRunDetails) -> f64 {
    if details.total == 0 {
        return 0.0;
    }
    (details.current as f64 / details.total as f64).clamp(0.0, 1.0)
}

fn elapsed_since(started_at: DateTime<Utc>) -> Duration {
    (Utc::now() - started_at).to_std().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn row(reporter: &TerminalReporter<TestBackend>, y: u16) -> String {
        let buffer = reporter.backend().buffer();
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol())
            .collect::<String>()
    }

    fn details(current: usize, total: usize) -> ActiveRunDetails {
        ActiveRunDetails {
            total,
            current,
            step_name: "build".to_string(),
            is_done: false,
            status: "in_progress".to_string(),
        }
    }

    #[test]
    fn test_ratio_is_clamped() {
        assert_eq!(ratio(&details(0, 0)), 0.0);
        assert_eq!(ratio(&details(1, 4)), 0.25);
        assert_eq!(ratio(&details(4, 4)), 1.0);
        assert_eq!(ratio(&details(5, 4)), 1.0);
    }

    #[test]
    fn test_stage_updates_status_row() {
        let mut reporter = TerminalReporter::new(TestBackend::new(80, 6)).unwrap();

        reporter
            .report(ProgressEvent::Stage("searching workflows".to_string()))
            .unwrap();
        assert!(row(&reporter, 0).starts_with("searching workflows"));

        reporter
            .report(ProgressEvent::Stage("running job".to_string()))
            .unwrap();
        assert!(row(&reporter, 0).starts_with("running job"));
    }

    #[test]
    fn test_bar_shows_step_prefix() {
        let mut reporter = TerminalReporter::new(TestBackend::new(80, 6)).unwrap();

        reporter
            .report(ProgressEvent::BarCreated {
                details: details(2, 4),
                started_at: Utc::now(),
            })
            .unwrap();

        assert!(row(&reporter, 1).contains("2/4. build"));
    }
}
