use crate::areas::repository::Repository;
use crate::areas::workspace::Workspace;
use crate::artifacts::core::{Reporter, error_chain};
use crate::artifacts::errors::EntryError;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::outcome::{RecoveryOutcome, RecoverySummary};
use anyhow::Context;

/// A blob of the HEAD tree, or a subtree that could not be read
enum TreeItem {
    Blob { name: String, oid: ObjectId },
    Unreadable { name: String, reason: EntryError },
}

impl Repository {
    /// Write every file of the commit at HEAD into the workspace
    ///
    /// Unreadable blobs or subtrees are reported and skipped; an unresolvable
    /// HEAD, commit or root tree fails the whole restore.
    pub async fn restore(
        &self,
        workspace: &Workspace,
        reporter: &mut Reporter,
    ) -> anyhow::Result<RecoverySummary> {
        let head = self
            .refs()
            .read_head()?
            .ok_or_else(|| anyhow::anyhow!("HEAD does not point to a commit"))?;
        let commit = self
            .database()
            .parse_object_as_commit(&head)?
            .ok_or_else(|| anyhow::anyhow!("HEAD {} is not a commit", head))?;

        tracing::info!(
            commit = %head.to_short_oid(),
            message = commit.short_message(),
            "restoring HEAD"
        );

        let mut items = Vec::new();
        self.collect_tree(commit.tree_oid(), "", &mut items)
            .with_context(|| format!("Unable to read root tree {}", commit.tree_oid()))?;

        let mut summary = RecoverySummary::for_listing(items.len());

        for item in items {
            let outcome = match item {
                TreeItem::Blob { name, oid } => self.restore_blob(workspace, name, &oid).await,
                TreeItem::Unreadable { name, reason } => RecoveryOutcome::Failed { name, reason },
            };

            if let RecoveryOutcome::Failed { name, reason } = &outcome {
                tracing::warn!(name = %name, error = %error_chain(reason), "file skipped");
            }
            summary.record(&outcome);
            reporter.outcome(&outcome);
        }

        reporter.completed(&summary);

        Ok(summary)
    }

    /// Flatten a tree into its blobs, depth first
    ///
    /// Only the tree passed in must be readable; nested trees that fail are
    /// recorded as unreadable items.
    fn collect_tree(
        &self,
        tree_oid: &ObjectId,
        prefix: &str,
        items: &mut Vec<TreeItem>,
    ) -> anyhow::Result<()> {
        let tree = self
            .database()
            .parse_object_as_tree(tree_oid)?
            .ok_or_else(|| anyhow::anyhow!("object {} is not a tree", tree_oid))?;

        for (name, entry) in tree.into_entries() {
            let name = format!("{prefix}{name}");

            if entry.is_tree() {
                if let Err(source) = self.collect_tree(&entry.oid, &format!("{name}/"), items) {
                    items.push(TreeItem::Unreadable {
                        name,
                        reason: EntryError::Object {
                            oid: entry.oid,
                            source,
                        },
                    });
                }
            } else if entry.is_blob() {
                items.push(TreeItem::Blob {
                    name,
                    oid: entry.oid,
                });
            } else {
                tracing::debug!(name = %name, "skipping submodule");
            }
        }

        Ok(())
    }

    async fn restore_blob(
        &self,
        workspace: &Workspace,
        name: String,
        oid: &ObjectId,
    ) -> RecoveryOutcome {
        let content = match self.database().load_blob(oid) {
            Ok(content) => content,
            Err(source) => {
                return RecoveryOutcome::Failed {
                    name,
                    reason: EntryError::Object {
                        oid: oid.clone(),
                        source,
                    },
                };
            }
        };

        let path = match workspace.sanitize(&name) {
            Ok(path) => path,
            Err(err) => {
                return RecoveryOutcome::Failed {
                    name,
                    reason: err.into(),
                };
            }
        };

        match workspace.write_file(&path, &content).await {
            Ok(()) => RecoveryOutcome::Recovered {
                name,
                path,
                size: content.len(),
            },
            Err(source) => RecoveryOutcome::Failed {
                name,
                reason: EntryError::Write { path, source },
            },
        }
    }
}
