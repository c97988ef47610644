//! Core of depinambour: module identities, the module graph, detection of
//! modules held below a reference version, and rendering of the affected
//! paths as a tree.

pub mod config;
pub mod conflict;
pub mod graph;
pub mod identity;
pub mod render;
