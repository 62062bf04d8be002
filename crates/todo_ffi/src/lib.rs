//! Flutter-facing FFI surface for the to-do core.

pub mod api;
