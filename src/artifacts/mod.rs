//! Git data structures and shared types
//!
//! - `core`: Console reporting
//! - `database`: Tree entry types
//! - `errors`: Error types of the recovery engine
//! - `index`: Index file format
//! - `objects`: Git object types (tree, commit) and loose object framing
//! - `outcome`: Per-entry and per-run results

pub mod core;
pub mod database;
pub mod errors;
pub mod index;
pub mod objects;
pub mod outcome;
