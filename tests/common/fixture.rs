//! Builders for `.git` contents: loose objects, index files and local repositories

use flate2::Compression;
use flate2::write::ZlibEncoder;
use sha1::{Digest, Sha1};
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::Path;

pub const ZERO_OID: &str = "0000000000000000000000000000000000000000";

/// Framed and compressed object, as stored under `objects/`
#[derive(Debug, Clone)]
pub struct LooseObject {
    pub oid: String,
    pub compressed: Vec<u8>,
}

impl LooseObject {
    pub fn new(kind: &str, content: &[u8]) -> Self {
        let mut framed = format!("{kind} {}\0", content.len()).into_bytes();
        framed.extend_from_slice(content);

        let oid = to_hex(&Sha1::digest(&framed));

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&framed).expect("in-memory write");
        let compressed = encoder.finish().expect("in-memory write");

        LooseObject { oid, compressed }
    }

    pub fn blob(content: &[u8]) -> Self {
        Self::new("blob", content)
    }

    /// Path relative to the git directory
    pub fn path(&self) -> String {
        format!("objects/{}/{}", &self.oid[..2], &self.oid[2..])
    }
}

pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}

pub fn from_hex(hex: &str) -> Vec<u8> {
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).expect("valid hex"))
        .collect()
}

/// Index file with a custom header, for malformed-index cases
pub fn encode_index_with_header(
    signature: &[u8; 4],
    version: u32,
    declared: u32,
    entries: &[(&str, &str)],
) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(signature);
    bytes.extend_from_slice(&version.to_be_bytes());
    bytes.extend_from_slice(&declared.to_be_bytes());

    for (name, oid) in entries {
        bytes.extend_from_slice(&encode_entry(name, oid));
    }

    // trailing checksum is never verified
    bytes.extend_from_slice(&[0xab; 20]);

    bytes
}

/// Well-formed version 2 index listing `(name, oid)` pairs
pub fn encode_index(entries: &[(&str, &str)]) -> Vec<u8> {
    encode_index_with_header(b"DIRC", 2, entries.len() as u32, entries)
}

pub fn encode_entry(name: &str, oid: &str) -> Vec<u8> {
    // ctime, mtime, dev, ino, mode, uid, gid, size: 40 bytes
    let mut bytes = vec![0u8; 40];
    bytes[24..28].copy_from_slice(&0o100644u32.to_be_bytes());
    bytes.extend_from_slice(&from_hex(oid));

    let name_length = name.len().min(0xfff);
    bytes.extend_from_slice(&(name_length as u16).to_be_bytes());
    bytes.extend_from_slice(name.as_bytes());

    // NUL padding to the next multiple of eight, at least one byte
    let padding = 8 - (bytes.len() % 8);
    bytes.extend(std::iter::repeat_n(0u8, padding));

    bytes
}

/// In-memory `.git` directory as a web server would publish it
#[derive(Debug, Default, Clone)]
pub struct ExposedGit {
    files: HashMap<String, Vec<u8>>,
    entries: Vec<(String, String)>,
}

impl ExposedGit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track `name` in the index and publish its blob
    pub fn add_file(&mut self, name: &str, content: &[u8]) -> String {
        let object = LooseObject::blob(content);
        self.files.insert(object.path(), object.compressed.clone());
        self.entries.push((name.to_string(), object.oid.clone()));

        object.oid
    }

    /// Track `name` in the index without publishing any object
    pub fn add_missing(&mut self, name: &str, oid: &str) {
        self.entries.push((name.to_string(), oid.to_string()));
    }

    /// Track `name` and publish `body` verbatim as its object
    pub fn add_raw_object(&mut self, name: &str, oid: &str, body: &[u8]) {
        self.files.insert(
            format!("objects/{}/{}", &oid[..2], &oid[2..]),
            body.to_vec(),
        );
        self.entries.push((name.to_string(), oid.to_string()));
    }

    /// Publish `index` instead of the one built from tracked entries
    pub fn with_index(mut self, index: Vec<u8>) -> Self {
        self.files.insert("index".to_string(), index);
        self
    }

    pub fn index_bytes(&self) -> Vec<u8> {
        let entries = self
            .entries
            .iter()
            .map(|(name, oid)| (name.as_str(), oid.as_str()))
            .collect::<Vec<_>>();

        encode_index(&entries)
    }

    /// Published files keyed by their path below `.git/`
    pub fn into_files(mut self) -> HashMap<String, Vec<u8>> {
        if !self.files.contains_key("index") {
            let index = self.index_bytes();
            self.files.insert("index".to_string(), index);
        }

        self.files
    }
}

enum Node {
    File(Vec<u8>),
    Dir(BTreeMap<String, Node>),
}

/// Write a repository whose HEAD commit holds `files` into `git_dir`
///
/// Returns the commit id.
pub fn write_local_repository(git_dir: &Path, files: &[(&str, &str)]) -> String {
    let mut root = BTreeMap::new();
    for (name, content) in files {
        insert_node(&mut root, name, content.as_bytes().to_vec());
    }

    let tree_oid = write_tree(git_dir, &root);
    let commit = LooseObject::new(
        "commit",
        format!(
            "tree {tree_oid}\n\
             author A U Thor <author@example.com> 1700000000 +0000\n\
             committer A U Thor <author@example.com> 1700000000 +0000\n\
             \n\
             Initial commit\n"
        )
        .as_bytes(),
    );
    write_object(git_dir, &commit);

    std::fs::create_dir_all(git_dir.join("refs/heads")).expect("create refs");
    std::fs::write(git_dir.join("HEAD"), "ref: refs/heads/main\n").expect("write HEAD");
    std::fs::write(
        git_dir.join("refs/heads/main"),
        format!("{}\n", commit.oid),
    )
    .expect("write branch");

    commit.oid
}

pub fn write_object(git_dir: &Path, object: &LooseObject) {
    let path = git_dir.join(object.path());
    std::fs::create_dir_all(path.parent().expect("object has a fan-out directory"))
        .expect("create object directory");
    std::fs::write(path, &object.compressed).expect("write object");
}

pub fn blob_oid(content: &str) -> String {
    LooseObject::blob(content.as_bytes()).oid
}

fn insert_node(dir: &mut BTreeMap<String, Node>, name: &str, content: Vec<u8>) {
    match name.split_once('/') {
        Some((head, rest)) => {
            let child = dir
                .entry(head.to_string())
                .or_insert_with(|| Node::Dir(BTreeMap::new()));
            if let Node::Dir(child) = child {
                insert_node(child, rest, content);
            }
        }
        None => {
            dir.insert(name.to_string(), Node::File(content));
        }
    }
}

fn write_tree(git_dir: &Path, dir: &BTreeMap<String, Node>) -> String {
    let mut content = Vec::new();

    for (name, node) in dir {
        let (mode, oid) = match node {
            Node::File(data) => {
                let blob = LooseObject::blob(data);
                write_object(git_dir, &blob);
                ("100644", blob.oid)
            }
            Node::Dir(children) => ("40000", write_tree(git_dir, children)),
        };

        content.extend_from_slice(format!("{mode} {name}\0").as_bytes());
        content.extend_from_slice(&from_hex(&oid));
    }

    let tree = LooseObject::new("tree", &content);
    write_object(git_dir, &tree);

    tree.oid
}
