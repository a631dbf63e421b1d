//! Error types of the recovery engine
//!
//! Only [`RecoveryError`] ends a run. Everything an individual entry can hit is
//! an [`EntryError`], which is reported and skipped.

use crate::artifacts::objects::object_id::ObjectId;
use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

/// Fatal problems with the index stream itself
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("not a valid index stream: bad signature {0:?}")]
    InvalidSignature([u8; 4]),

    #[error("unsupported index version {0}, only version 2 is supported")]
    UnsupportedVersion(u32),

    #[error("index stream ends inside its header")]
    TruncatedHeader(#[source] std::io::Error),
}

/// Failure to retrieve or inflate one remote resource
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to request {url}")]
    Request {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to download {url}: {status}")]
    HttpStatus { url: Url, status: StatusCode },

    #[error("object is not a valid zlib stream")]
    Inflate(#[source] std::io::Error),

    #[error("invalid url")]
    InvalidUrl(#[from] url::ParseError),
}

/// An untrusted entry name that cannot be written safely
#[derive(Debug, Error)]
pub enum SanitizeError {
    #[error("path {} escapes the output directory", .0.display())]
    EscapesRoot(PathBuf),

    #[error("path resolves to the output directory itself")]
    Empty,
}

/// Why a single entry was skipped
#[derive(Debug, Error)]
pub enum EntryError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Sanitize(#[from] SanitizeError),

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read object {oid}")]
    Object {
        oid: ObjectId,
        #[source]
        source: anyhow::Error,
    },

    #[error("recovery task failed")]
    Task(#[from] tokio::task::JoinError),
}

/// Conditions that abort a whole remote recovery run
#[derive(Debug, Error)]
pub enum RecoveryError {
    #[error("failed to fetch the index")]
    IndexFetch(#[source] FetchError),

    #[error(transparent)]
    Index(#[from] IndexError),
}
