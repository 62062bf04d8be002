//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `todo_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("todo_core ping={}", todo_core::ping());
    println!("todo_core version={}", todo_core::core_version());
    println!("todo_core document={}", todo_core::DOCUMENT_FILE_NAME);
}
