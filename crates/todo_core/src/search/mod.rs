//! Read-only task queries.
//!
//! # Responsibility
//! - Expose cross-folder lookups used by the home screen (search, starred).
//! - Keep result shaping inside core.

pub mod tasks;
