//! Results of recovering individual entries and whole runs

use crate::artifacts::errors::EntryError;
use std::path::PathBuf;

/// What happened to one entry
#[derive(Debug)]
pub enum RecoveryOutcome {
    Recovered {
        /// Name as declared by the index or tree
        name: String,
        /// Where the content was written
        path: PathBuf,
        /// Number of content bytes written
        size: usize,
    },
    Failed {
        name: String,
        reason: EntryError,
    },
}

impl RecoveryOutcome {
    pub fn name(&self) -> &str {
        match self {
            RecoveryOutcome::Recovered { name, .. } | RecoveryOutcome::Failed { name, .. } => name,
        }
    }

    pub fn is_recovered(&self) -> bool {
        matches!(self, RecoveryOutcome::Recovered { .. })
    }
}

/// Tally of a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoverySummary {
    /// Entry count claimed by the index header
    pub declared: u32,
    /// Entries actually decoded
    pub decoded: usize,
    /// The index stream ended early
    pub truncated: bool,
    pub recovered: usize,
    pub failed: usize,
}

impl RecoverySummary {
    /// Summary of a run over a complete list of `count` entries
    ///
    /// `declared` saturates at `u32::MAX`, the most an index header can claim.
    pub fn for_listing(count: usize) -> Self {
        RecoverySummary {
            declared: u32::try_from(count).unwrap_or(u32::MAX),
            decoded: count,
            ..Default::default()
        }
    }

    pub fn record(&mut self, outcome: &RecoveryOutcome) {
        if outcome.is_recovered() {
            self.recovered += 1;
        } else {
            self.failed += 1;
        }
    }
}
