//! Component descriptors supplied by the surrounding workspace tool.
//!
//! Components arrive pre-resolved: each one carries a stable id, a source root
//! relative to the workspace, and absolute package/workspace directories. The
//! orchestrator never mutates them.

mod types;

pub use types::*;
