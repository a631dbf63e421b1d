use crate::artifacts::database::entry_mode::EntryMode;
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;

#[derive(Debug, Clone, PartialEq, new)]
pub struct DatabaseEntry {
    pub oid: ObjectId,
    pub mode: EntryMode,
}

impl DatabaseEntry {
    pub fn is_tree(&self) -> bool {
        self.mode == EntryMode::Directory
    }

    /// Whether the entry's content is stored as a blob in this repository
    pub fn is_blob(&self) -> bool {
        matches!(
            self.mode,
            EntryMode::Regular | EntryMode::Executable | EntryMode::Symlink
        )
    }
}
