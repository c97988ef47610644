//! Shared utilities for depinambour.
//!
//! Cross-cutting concerns used by the other crates: the error taxonomy,
//! external process spawning, and terminal status/progress indicators.

pub mod errors;
pub mod process;
pub mod progress;
