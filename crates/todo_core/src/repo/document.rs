//! JSON document codec.
//!
//! The top-level value is an array of folder objects. Output is pretty-printed
//! so the file stays readable when inspected on device.

use super::{RepoError, RepoResult};
use crate::model::folder::Folder;

/// Serializes the full collection to document bytes.
pub fn encode_document(folders: &[Folder]) -> RepoResult<Vec<u8>> {
    serde_json::to_vec_pretty(folders).map_err(RepoError::Encode)
}

/// Parses document bytes back into an ordered collection.
pub fn decode_document(bytes: &[u8]) -> RepoResult<Vec<Folder>> {
    serde_json::from_slice(bytes).map_err(RepoError::Decode)
}
