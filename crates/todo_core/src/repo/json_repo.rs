//! File-backed JSON repository.
//!
//! # Responsibility
//! - Store the Folder Collection as one JSON file in app-local storage.
//! - Report read/write failures as typed `RepoError`s.
//!
//! # Invariants
//! - The document path is fixed at construction: `<data_dir>/folders.json`.
//! - A missing file means "no data yet" and loads as an empty collection.
//! - Writes replace the file in place; no temp file, no rename.

use super::document::{decode_document, encode_document};
use super::{FolderRepository, RepoResult};
use crate::model::folder::Folder;
use log::{error, info};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// File name of the persisted document inside the data directory.
pub const DOCUMENT_FILE_NAME: &str = "folders.json";

/// JSON document repository rooted at one data directory.
#[derive(Debug, Clone)]
pub struct JsonFileFolderRepository {
    path: PathBuf,
}

impl JsonFileFolderRepository {
    /// Creates a repository that stores `folders.json` under `data_dir`.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(DOCUMENT_FILE_NAME),
        }
    }

    /// Creates a repository for an explicit document path.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FolderRepository for JsonFileFolderRepository {
    fn load(&self) -> RepoResult<Vec<Folder>> {
        let started_at = Instant::now();

        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("event=document_load module=repo status=skip reason=missing_file");
                return Ok(Vec::new());
            }
            Err(err) => {
                error!(
                    "event=document_load module=repo status=error duration_ms={} error_code=io_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err.into());
            }
        };

        match decode_document(&bytes) {
            Ok(folders) => {
                info!(
                    "event=document_load module=repo status=ok duration_ms={} bytes={} folders={}",
                    started_at.elapsed().as_millis(),
                    bytes.len(),
                    folders.len()
                );
                Ok(folders)
            }
            Err(err) => {
                error!(
                    "event=document_load module=repo status=error duration_ms={} error_code={} error={}",
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }

    fn save(&self, folders: &[Folder]) -> RepoResult<()> {
        let started_at = Instant::now();
        let bytes = encode_document(folders)?;

        let written = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map_or(Ok(()), std::fs::create_dir_all)
            .and_then(|()| std::fs::write(&self.path, &bytes));

        match written {
            Ok(()) => {
                info!(
                    "event=document_save module=repo status=ok duration_ms={} bytes={} folders={}",
                    started_at.elapsed().as_millis(),
                    bytes.len(),
                    folders.len()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=document_save module=repo status=error duration_ms={} error_code=io_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{JsonFileFolderRepository, DOCUMENT_FILE_NAME};
    use crate::repo::{FolderRepository, RepoError};

    #[test]
    fn document_path_uses_fixed_file_name() {
        let repo = JsonFileFolderRepository::new("/data/app");
        assert!(repo.path().ends_with(DOCUMENT_FILE_NAME));
    }

    #[test]
    fn save_creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileFolderRepository::new(dir.path().join("nested").join("docs"));

        repo.save(&[]).unwrap();
        assert!(repo.path().exists());
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn load_reports_decode_error_for_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileFolderRepository::new(dir.path());
        std::fs::write(repo.path(), b"not json").unwrap();

        let err = repo.load().unwrap_err();
        assert!(matches!(err, RepoError::Decode(_)));
    }
}
