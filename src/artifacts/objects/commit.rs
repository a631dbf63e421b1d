//! Git commit object
//!
//! Only the header lines that locate the snapshot are interpreted:
//!
//! ```text
//! tree <tree-sha>
//! parent <parent-sha>
//! author ...
//! ```
//!
//! Parent, author and committer lines are skipped; the message follows the
//! first empty line.

use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use std::io::BufRead;

#[derive(Debug, Clone, new)]
pub struct Commit {
    tree_oid: ObjectId,
    message: String,
}

impl Commit {
    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    /// First line of the commit message
    pub fn short_message(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }
}

impl Unpackable for Commit {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;

        let content = String::from_utf8_lossy(&content);
        let mut lines = content.lines();

        let tree_line = lines
            .next()
            .context("Invalid commit object: missing tree line")?;
        let tree_oid = tree_line
            .strip_prefix("tree ")
            .context("Invalid commit object: invalid tree line")?;
        let tree_oid = ObjectId::try_parse(tree_oid.to_string())?;

        // the message starts after the first empty line
        let message = lines
            .skip_while(|line| !line.is_empty())
            .skip(1)
            .collect::<Vec<_>>()
            .join("\n");

        Ok(Self::new(tree_oid, message))
    }
}
