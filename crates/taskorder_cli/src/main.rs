//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `taskorder_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("taskorder_core version={}", taskorder_core::core_version());
}
