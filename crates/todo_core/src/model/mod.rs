//! Domain model for folders and their tasks.
//!
//! # Responsibility
//! - Define the records that make up the Folder Collection.
//! - Keep field names aligned with the persisted JSON document.
//!
//! # Invariants
//! - Every task and folder is identified by a stable UUID.
//! - Every task belongs to exactly one folder.

pub mod folder;
pub mod task;
