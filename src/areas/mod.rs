//! Core recovery components
//!
//! - `database`: Loose object database of a local repository
//! - `index`: Decoding of the index (tracked files and their blobs)
//! - `recovery`: Remote recovery run and its stages
//! - `refs`: Reference resolution (HEAD, branches, packed refs)
//! - `remote`: Object sources, including the HTTP one
//! - `repository`: Local repository opened for recovery
//! - `workspace`: Output directory and path confinement

pub mod database;
pub mod index;
pub mod recovery;
pub mod refs;
pub mod remote;
pub mod repository;
pub mod workspace;
