//! Core utilities and shared types
//!
//! This module contains shared utilities used across the application.

use crate::artifacts::outcome::{RecoveryOutcome, RecoverySummary};
use colored::Colorize;
use std::error::Error;
use std::io::{self, Write};

/// Console tally of a recovery run
///
/// Prints one `[√] name` or `[x] name: reason` line per entry. Diagnostics go
/// through `tracing`; this is the user-facing output only.
///
/// Console output never fails a run. After the first failed write (a closed
/// pipe, typically) the reporter logs a warning and goes quiet.
pub struct Reporter {
    writer: Option<Box<dyn Write + Send>>,
}

impl Reporter {
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Reporter {
            writer: Some(writer),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// A write has failed and further output is dropped
    pub fn is_closed(&self) -> bool {
        self.writer.is_none()
    }

    pub fn outcome(&mut self, outcome: &RecoveryOutcome) {
        // names come from untrusted index and tree entries
        let name = remove_control_characters(outcome.name());

        let line = match outcome {
            RecoveryOutcome::Recovered { .. } => format!("{} {}", "[√]".green(), name),
            RecoveryOutcome::Failed { reason, .. } => format!(
                "{} {}: {}",
                "[x]".red(),
                name,
                remove_control_characters(&error_chain(reason))
            ),
        };

        self.emit(|writer| writeln!(writer, "{line}"));
    }

    pub fn index_stats(&mut self, version: u32, declared: u32) {
        self.emit(|writer| {
            writeln!(writer, "Index version: {version}")?;
            writeln!(writer, "Declared entries: {declared}")
        });
    }

    pub fn truncated(&mut self, decoded: usize, declared: u32) {
        self.emit(|writer| {
            writeln!(
                writer,
                "{} index ends early, recovering {decoded} of {declared} entries",
                "[!]".yellow()
            )
        });
    }

    pub fn completed(&mut self, summary: &RecoverySummary) {
        self.emit(|writer| {
            writeln!(
                writer,
                "Recovery completed: {} recovered, {} failed",
                summary.recovered, summary.failed
            )?;
            writer.flush()
        });
    }

    fn emit(&mut self, write: impl FnOnce(&mut dyn Write) -> io::Result<()>) {
        let Some(writer) = self.writer.as_mut() else {
            return;
        };

        if let Err(err) = write(writer.as_mut()) {
            tracing::warn!(error = %err, "console output failed, continuing without it");
            self.writer = None;
        }
    }
}

/// Drop every character below U+0020, NUL and ESC included
pub fn remove_control_characters(s: &str) -> String {
    s.chars().filter(|&c| c >= ' ').collect()
}

/// Render an error followed by all of its sources
pub fn error_chain(err: &dyn Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }

    rendered
}
