//! High-level operations wiring the CLI to the core crates.

pub mod ops_audit;
pub mod producer;
