//! Recovery entry points
//!
//! - `remote`: Rebuild the work tree from a web-exposed `.git` directory
//! - `local`: Rebuild the work tree from HEAD of an on-disk repository
//!
//! Both write through the same sanitizing workspace and report the same way.

pub mod local;
pub mod remote;
