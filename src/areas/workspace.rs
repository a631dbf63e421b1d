//! Output directory for recovered files
//!
//! Every path written here originates from untrusted data (an index entry or a
//! tree entry), so it is confined to the output root before anything touches
//! the file system.

use crate::artifacts::core::remove_control_characters;
use crate::artifacts::errors::SanitizeError;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

#[derive(Debug)]
pub struct Workspace {
    /// Lexically cleaned output root
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Workspace {
            path: clean(path.as_ref()).into_boxed_path(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Map an untrusted relative name to a path inside the output root
    ///
    /// The name is appended to the root textually, so a leading `/` cannot
    /// replace the root. The joined path is cleaned, stripped of control
    /// characters, cleaned again and must still lie strictly below the root.
    pub fn sanitize(&self, name: &str) -> Result<PathBuf, SanitizeError> {
        let mut joined = OsString::from(self.path.as_os_str());
        joined.push("/");
        joined.push(name);

        let cleaned = clean(Path::new(&joined));
        let stripped = remove_control_characters(&cleaned.to_string_lossy());
        let path = clean(Path::new(&stripped));

        let relative = if self.path.as_ref() == Path::new(".") {
            path.as_path()
        } else {
            path.strip_prefix(&self.path)
                .map_err(|_| SanitizeError::EscapesRoot(path.clone()))?
        };

        match relative.components().next() {
            Some(Component::Normal(_)) => Ok(path),
            None => Err(SanitizeError::Empty),
            Some(_) => Err(SanitizeError::EscapesRoot(path)),
        }
    }

    /// Write a recovered file, creating its parent directories
    ///
    /// Existing files are overwritten.
    pub async fn write_file(&self, path: &Path, data: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(path, data).await
    }
}

/// Lexically normalize a path
///
/// Drops `.` segments and repeated separators and resolves `..` against the
/// preceding segment. Leading `..` segments of a relative path are kept; `..`
/// directly below the file system root is dropped. An empty result is `.`.
pub fn clean(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match cleaned.components().next_back() {
                Some(Component::Normal(_)) => {
                    cleaned.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => cleaned.push(".."),
            },
            other => cleaned.push(other.as_os_str()),
        }
    }

    if cleaned.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        cleaned
    }
}
