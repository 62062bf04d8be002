//! Persistence gateway for the Folder Collection.
//!
//! # Responsibility
//! - Define the whole-document load/save contract.
//! - Keep file format and I/O details out of the store layer.
//!
//! # Invariants
//! - `save` always replaces the full document; there are no partial writes.
//! - `load(save(x)) == x` field for field, including task order.
//! - Ids are decoded as stored and never regenerated.

use crate::model::folder::Folder;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod document;
pub mod json_repo;
pub mod memory_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence error for document read/write.
#[derive(Debug)]
pub enum RepoError {
    /// File system failure while reading, writing, or creating directories.
    Io(std::io::Error),
    /// Collection could not be serialized.
    Encode(serde_json::Error),
    /// Stored bytes are not a valid folder document.
    Decode(serde_json::Error),
    /// Backend was configured to reject writes.
    Unavailable(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "document I/O failed: {err}"),
            Self::Encode(err) => write!(f, "document encode failed: {err}"),
            Self::Decode(err) => write!(f, "document decode failed: {err}"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Decode(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for RepoError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl RepoError {
    /// Stable short code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "io_failed",
            Self::Encode(_) => "encode_failed",
            Self::Decode(_) => "decode_failed",
            Self::Unavailable(_) => "unavailable",
        }
    }
}

/// Whole-document storage for the Folder Collection.
pub trait FolderRepository {
    /// Reads the stored collection.
    ///
    /// Returns `Ok(vec![])` when nothing has been saved yet.
    fn load(&self) -> RepoResult<Vec<Folder>>;
    /// Replaces the stored collection with `folders`.
    fn save(&self, folders: &[Folder]) -> RepoResult<()>;
}
