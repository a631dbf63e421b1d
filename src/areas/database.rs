use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{self, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use anyhow::Context;
use bytes::Bytes;
use std::io::{BufRead, Cursor};
use std::path::Path;

/// Loose object database of a local repository
///
/// Packed objects are not read.
#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    /// Inflated payload of an object, framing header included
    pub fn load(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        let object_path = self.path.join(object_id.to_path());

        let compressed = std::fs::read(&object_path).with_context(|| {
            format!(
                "Unable to read object {} (packed objects are not supported)",
                object_id
            )
        })?;

        object::inflate(compressed.as_slice())
            .with_context(|| format!("Unable to decompress object {}", object_id))
    }

    /// Content of a blob, without its header
    pub fn load_blob(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        let payload = self.load(object_id)?;
        let mut reader = Cursor::new(&payload);
        let (object_type, _) = ObjectType::parse_header(&mut reader)?;

        if object_type != ObjectType::Blob {
            anyhow::bail!("object {} is a {}, not a blob", object_id, object_type);
        }

        Ok(payload.slice(reader.position() as usize..))
    }

    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> anyhow::Result<Option<Commit>> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Commit => Ok(Some(Commit::deserialize(object_reader)?)),
            _ => Ok(None),
        }
    }

    pub fn parse_object_as_tree(&self, object_id: &ObjectId) -> anyhow::Result<Option<Tree>> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Tree => Ok(Some(Tree::deserialize(object_reader)?)),
            _ => Ok(None),
        }
    }

    fn parse_object_as_bytes(
        &self,
        object_id: &ObjectId,
    ) -> anyhow::Result<(ObjectType, impl BufRead)> {
        let mut object_reader = Cursor::new(self.load(object_id)?);
        let (object_type, _) = ObjectType::parse_header(&mut object_reader)?;

        Ok((object_type, object_reader))
    }
}
