use crate::areas::database::Database;
use crate::areas::refs::Refs;
use std::path::Path;

/// Local repository opened for recovery
///
/// Only the git directory matters here; the work tree, if any, is ignored.
pub struct Repository {
    /// Path to the git directory
    path: Box<Path>,
    database: Database,
    refs: Refs,
}

impl Repository {
    /// Open a repository from its work tree or its git directory
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.is_dir() {
            anyhow::bail!("{} is not a directory", path.display());
        }

        let dot_git = path.join(".git");
        let git_dir = if dot_git.is_dir() {
            dot_git
        } else {
            path.to_path_buf()
        };

        if !git_dir.join("HEAD").is_file() || !git_dir.join("objects").is_dir() {
            anyhow::bail!("{} is not a git repository", path.display());
        }

        Ok(Repository {
            database: Database::new(git_dir.join("objects").into_boxed_path()),
            refs: Refs::new(git_dir.clone().into_boxed_path()),
            path: git_dir.into_boxed_path(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }
}
