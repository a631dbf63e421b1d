//! Git references (HEAD, branches, tags)
//!
//! Read-only resolution of `HEAD` for local recovery.
//!
//! ## File Format
//!
//! References are stored as text files containing either:
//! - A 40-character SHA-1 hash (direct reference)
//! - `ref: <path>` for symbolic references
//!
//! References that were packed by `git gc` live in `packed-refs` instead,
//! one `<sha> <name>` pair per line.

use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use std::path::Path;

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

/// Symbolic references are followed at most this many times
const MAX_SYMREF_DEPTH: usize = 10;

/// Git references reader
#[derive(Debug, new)]
pub struct Refs {
    /// Path to the git directory (typically `.git`)
    path: Box<Path>,
}

/// Content of a reference
#[derive(Debug, Clone, PartialEq)]
enum SymRefOrOid {
    /// Symbolic reference pointing to another ref
    SymRef { name: String },
    /// Direct object ID
    Oid(ObjectId),
}

impl SymRefOrOid {
    fn parse(content: &str) -> anyhow::Result<Option<SymRefOrOid>> {
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        let symref_match = regex::Regex::new(SYMREF_REGEX)?.captures(content);
        if let Some(symref_match) = symref_match {
            Ok(Some(SymRefOrOid::SymRef {
                name: symref_match[1].to_string(),
            }))
        } else {
            Ok(Some(SymRefOrOid::Oid(ObjectId::try_parse(
                content.to_string(),
            )?)))
        }
    }
}

impl Refs {
    /// Resolve `HEAD` to the commit it points at
    ///
    /// Returns `None` for an unborn branch (HEAD names a ref that does not
    /// exist yet).
    pub fn read_head(&self) -> anyhow::Result<Option<ObjectId>> {
        self.resolve(HEAD_REF_NAME)
    }

    /// Follow a reference by name down to an object ID
    pub fn resolve(&self, name: &str) -> anyhow::Result<Option<ObjectId>> {
        let mut name = name.to_string();

        for _ in 0..MAX_SYMREF_DEPTH {
            match self.read_ref(&name)? {
                Some(SymRefOrOid::SymRef { name: target }) => name = target,
                Some(SymRefOrOid::Oid(oid)) => return Ok(Some(oid)),
                None => return Ok(None),
            }
        }

        anyhow::bail!("too many levels of symbolic references starting at {}", name)
    }

    /// Read a loose ref file, falling back to `packed-refs`
    fn read_ref(&self, name: &str) -> anyhow::Result<Option<SymRefOrOid>> {
        let ref_path = self.path.join(name);

        if ref_path.is_file() {
            let content = std::fs::read_to_string(&ref_path)
                .with_context(|| format!("failed to read ref file at {:?}", ref_path))?;
            return SymRefOrOid::parse(&content);
        }

        Ok(self.read_packed_ref(name)?.map(SymRefOrOid::Oid))
    }

    fn read_packed_ref(&self, name: &str) -> anyhow::Result<Option<ObjectId>> {
        let packed_path = self.path.join("packed-refs");
        if !packed_path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&packed_path)
            .with_context(|| format!("failed to read {:?}", packed_path))?;

        // comments start with '#', peeled tags with '^'
        content
            .lines()
            .filter(|line| !line.starts_with('#') && !line.starts_with('^'))
            .filter_map(|line| line.split_once(' '))
            .find(|(_, ref_name)| ref_name.trim() == name)
            .map(|(oid, _)| ObjectId::try_parse(oid.to_string()))
            .transpose()
    }
}
