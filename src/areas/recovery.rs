//! Remote recovery run
//!
//! A [`Recovery`] ties together an object source, the output workspace and
//! the console reporter. The run itself lives in `commands::remote`.
//!
//! ## Stages
//!
//! ```text
//! FetchingIndex -> Decoding -> Scheduling -> Draining -> Done
//!        \______________\________________________________-> FatalAbort
//! ```

use crate::areas::remote::ObjectSource;
use crate::areas::workspace::Workspace;
use crate::artifacts::core::Reporter;
use std::sync::Arc;

/// Stage of a remote recovery run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryStage {
    Idle,
    FetchingIndex,
    Decoding,
    Scheduling,
    Draining,
    Done,
    FatalAbort,
}

impl std::fmt::Display for RecoveryStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RecoveryStage::Idle => "idle",
            RecoveryStage::FetchingIndex => "fetching-index",
            RecoveryStage::Decoding => "decoding",
            RecoveryStage::Scheduling => "scheduling",
            RecoveryStage::Draining => "draining",
            RecoveryStage::Done => "done",
            RecoveryStage::FatalAbort => "fatal-abort",
        };
        write!(f, "{name}")
    }
}

pub struct Recovery<S: ObjectSource> {
    source: Arc<S>,
    workspace: Arc<Workspace>,
    /// Maximum number of entries in flight
    capacity: usize,
    reporter: Reporter,
    stage: RecoveryStage,
}

impl<S: ObjectSource> Recovery<S> {
    pub fn new(source: S, workspace: Workspace, reporter: Reporter) -> Self {
        Recovery {
            source: Arc::new(source),
            workspace: Arc::new(workspace),
            capacity: default_capacity(),
            reporter,
            stage: RecoveryStage::Idle,
        }
    }

    /// Override the number of concurrent entry tasks (at least one)
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    pub fn source(&self) -> Arc<S> {
        self.source.clone()
    }

    pub fn workspace(&self) -> Arc<Workspace> {
        self.workspace.clone()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn reporter(&mut self) -> &mut Reporter {
        &mut self.reporter
    }

    pub fn stage(&self) -> RecoveryStage {
        self.stage
    }

    pub(crate) fn enter(&mut self, stage: RecoveryStage) {
        tracing::debug!(from = %self.stage, to = %stage, "recovery stage");
        self.stage = stage;
    }
}

/// Twice the available parallelism
pub fn default_capacity() -> usize {
    std::thread::available_parallelism()
        .map(|cores| cores.get() * 2)
        .unwrap_or(2)
}
