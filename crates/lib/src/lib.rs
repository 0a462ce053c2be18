//! compbuild-lib: incremental, component-scoped build orchestration
//!
//! This crate drives a project-references compiler over a workspace of
//! components:
//! - `tsconfig`: synthesizes one build config per component from a shared template
//! - `manifest`: writes the root manifest that references every component config
//! - `backend`: the compiler seam, with a process-driving implementation
//! - `scheduler`: builds invalidated units in order and attributes diagnostics
//! - `compiler`: the facade tying the phases together

pub mod backend;
pub mod compiler;
pub mod component;
pub mod consts;
pub mod diagnostics;
pub mod dist;
pub mod error;
pub mod logger;
pub mod manifest;
pub mod scheduler;
pub mod tsconfig;
pub mod util;
pub mod workspace;
