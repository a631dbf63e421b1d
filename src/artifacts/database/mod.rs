//! Database entry types
//!
//! Types used when reading tree objects from a local object database.
//! A database entry references an object together with the mode recorded
//! for it in the parent tree.

pub mod database_entry;
pub mod entry_mode;
