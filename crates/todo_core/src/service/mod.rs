//! Application state services.
//!
//! # Responsibility
//! - Own the session's Folder Collection behind an explicit store object.
//! - Keep UI/FFI layers decoupled from storage and scheduler details.

pub mod folder_store;
