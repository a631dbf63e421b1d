/// Mode of an entry inside a tree object
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum EntryMode {
    Regular,
    Executable,
    Symlink,
    Directory,
    /// Submodule commit, stored in another repository
    Gitlink,
}

impl EntryMode {
    pub fn from_octal_str(mode: &str) -> anyhow::Result<Self> {
        let mode = u32::from_str_radix(mode, 8)
            .map_err(|_| anyhow::anyhow!("Invalid entry mode: {}", mode))?;

        Self::try_from(mode)
    }
}

impl TryFrom<u32> for EntryMode {
    type Error = anyhow::Error;

    fn try_from(mode: u32) -> anyhow::Result<Self> {
        match mode {
            // old trees may still carry group-writable blobs
            0o100644 | 0o100664 => Ok(EntryMode::Regular),
            0o100755 => Ok(EntryMode::Executable),
            0o120000 => Ok(EntryMode::Symlink),
            0o40000 => Ok(EntryMode::Directory),
            0o160000 => Ok(EntryMode::Gitlink),
            _ => Err(anyhow::anyhow!("Invalid entry mode: {:o}", mode)),
        }
    }
}
