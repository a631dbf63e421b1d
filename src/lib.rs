//! Recover the tracked files of a repository whose `.git` directory is
//! exposed, either over HTTP or on disk.

pub mod areas;
pub mod artifacts;
pub mod commands;
