use crate::areas::index::Index;
use crate::areas::recovery::{Recovery, RecoveryStage};
use crate::areas::remote::ObjectSource;
use crate::areas::workspace::Workspace;
use crate::artifacts::core::error_chain;
use crate::artifacts::errors::{EntryError, RecoveryError};
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object;
use crate::artifacts::outcome::{RecoveryOutcome, RecoverySummary};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{Id, JoinError, JoinSet};

impl<S: ObjectSource> Recovery<S> {
    /// Recover every file declared by the remote index
    ///
    /// Only a failure to obtain or validate the index aborts the run. Entries
    /// are recovered best-effort: each failure is reported and skipped.
    pub async fn recover(&mut self) -> Result<RecoverySummary, RecoveryError> {
        self.enter(RecoveryStage::FetchingIndex);
        let index_bytes = match self.source().fetch_index().await {
            Ok(bytes) => bytes,
            Err(err) => {
                self.enter(RecoveryStage::FatalAbort);
                return Err(RecoveryError::IndexFetch(err));
            }
        };

        self.enter(RecoveryStage::Decoding);
        let index = match Index::decode(&*index_bytes) {
            Ok(index) => index,
            Err(err) => {
                self.enter(RecoveryStage::FatalAbort);
                return Err(err.into());
            }
        };

        let mut summary = self.inspect_index(&index);
        let entries: Arc<[IndexEntry]> = index.into_entries().into();

        self.enter(RecoveryStage::Scheduling);
        let permits = Arc::new(Semaphore::new(self.capacity()));
        let mut tasks = JoinSet::new();
        let mut pending = HashMap::new();

        for position in 0..entries.len() {
            // blocks while `capacity` entries are in flight
            let Ok(permit) = permits.clone().acquire_owned().await else {
                break;
            };

            let source = self.source();
            let workspace = self.workspace();
            let task_entries = entries.clone();
            let handle = tasks.spawn(async move {
                let outcome =
                    recover_entry(&*source, &workspace, &task_entries[position]).await;
                drop(permit);
                outcome
            });
            pending.insert(handle.id(), position);

            while let Some(joined) = tasks.try_join_next_with_id() {
                self.settle(joined, &entries, &mut pending, &mut summary);
            }
        }

        self.enter(RecoveryStage::Draining);
        while let Some(joined) = tasks.join_next_with_id().await {
            self.settle(joined, &entries, &mut pending, &mut summary);
        }

        self.enter(RecoveryStage::Done);
        self.reporter().completed(&summary);

        Ok(summary)
    }

    fn inspect_index(&mut self, index: &Index) -> RecoverySummary {
        let header = index.header();
        tracing::info!(
            version = header.version,
            declared = header.entries_count,
            decoded = index.entries().len(),
            "index decoded"
        );
        self.reporter()
            .index_stats(header.version, header.entries_count);

        if let Some(err) = index.read_error() {
            tracing::warn!(error = %err, "index read failed, continuing with decoded entries");
        }
        if index.is_truncated() {
            tracing::warn!(
                decoded = index.entries().len(),
                declared = header.entries_count,
                "index stream is truncated"
            );
            self.reporter()
                .truncated(index.entries().len(), header.entries_count);
        }

        RecoverySummary {
            declared: header.entries_count,
            decoded: index.entries().len(),
            truncated: index.is_truncated(),
            ..Default::default()
        }
    }

    /// Account for a finished task and report its outcome
    fn settle(
        &mut self,
        joined: Result<(Id, RecoveryOutcome), JoinError>,
        entries: &[IndexEntry],
        pending: &mut HashMap<Id, usize>,
        summary: &mut RecoverySummary,
    ) {
        let outcome = match joined {
            Ok((id, outcome)) => {
                pending.remove(&id);
                outcome
            }
            Err(err) => {
                let name = pending
                    .remove(&err.id())
                    .map(|position| entries[position].name.clone())
                    .unwrap_or_default();
                RecoveryOutcome::Failed {
                    name,
                    reason: EntryError::Task(err),
                }
            }
        };

        if let RecoveryOutcome::Failed { name, reason } = &outcome {
            tracing::warn!(name = %name, error = %error_chain(reason), "entry skipped");
        }

        summary.record(&outcome);
        self.reporter().outcome(&outcome);
    }
}

async fn recover_entry<S: ObjectSource>(
    source: &S,
    workspace: &Workspace,
    entry: &IndexEntry,
) -> RecoveryOutcome {
    match try_recover_entry(source, workspace, entry).await {
        Ok((path, size)) => RecoveryOutcome::Recovered {
            name: entry.name.clone(),
            path,
            size,
        },
        Err(reason) => RecoveryOutcome::Failed {
            name: entry.name.clone(),
            reason,
        },
    }
}

/// Fetch, unframe, place and write one entry
async fn try_recover_entry<S: ObjectSource>(
    source: &S,
    workspace: &Workspace,
    entry: &IndexEntry,
) -> Result<(PathBuf, usize), EntryError> {
    let payload = source.fetch_object(&entry.oid).await?;
    let content = object::strip_header(&payload);

    let path = workspace.sanitize(&entry.name)?;
    workspace
        .write_file(&path, &content)
        .await
        .map_err(|source| EntryError::Write {
            path: path.clone(),
            source,
        })?;

    tracing::debug!(name = %entry.name, oid = %entry.oid, size = content.len(), "entry recovered");

    Ok((path, content.len()))
}
