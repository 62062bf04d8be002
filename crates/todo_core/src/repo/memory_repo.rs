//! In-memory repository.
//!
//! Keeps the last saved document as encoded bytes, so loads go through the
//! same codec as the file-backed repository.

use super::document::{decode_document, encode_document};
use super::{FolderRepository, RepoError, RepoResult};
use crate::model::folder::Folder;
use std::cell::{Cell, RefCell};

/// Volatile document storage for tests and disk-less hosts.
#[derive(Debug, Default)]
pub struct InMemoryFolderRepository {
    document: RefCell<Option<Vec<u8>>>,
    reject_writes: Cell<bool>,
}

impl InMemoryFolderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the stored document with raw bytes.
    pub fn with_document(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            document: RefCell::new(Some(bytes.into())),
            reject_writes: Cell::new(false),
        }
    }

    /// Makes subsequent `save` calls fail with `RepoError::Unavailable`.
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.set(reject);
    }

    /// Returns a copy of the stored document bytes, if any.
    pub fn document(&self) -> Option<Vec<u8>> {
        self.document.borrow().clone()
    }
}

impl FolderRepository for InMemoryFolderRepository {
    fn load(&self) -> RepoResult<Vec<Folder>> {
        match self.document.borrow().as_deref() {
            Some(bytes) => decode_document(bytes),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, folders: &[Folder]) -> RepoResult<()> {
        if self.reject_writes.get() {
            return Err(RepoError::Unavailable("writes are rejected".to_string()));
        }
        let bytes = encode_document(folders)?;
        self.document.replace(Some(bytes));
        Ok(())
    }
}
