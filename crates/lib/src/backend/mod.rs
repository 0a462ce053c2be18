//! Compiler backend seam.
//!
//! The scheduler never talks to a compiler directly. A [`CompilerBackend`]
//! opens the reference manifest and yields an [`InvalidatedGraph`]: the
//! projects that need (re)compiling, dependencies first. Completing a
//! [`BuildUnit`] compiles it and hands back its diagnostics.
//!
//! [`process::ProcessBackend`] drives an external compiler executable;
//! [`scripted::ScriptedGraph`] replays a fixed sequence for tests.

pub mod process;
mod project;
pub mod scripted;
mod types;

use std::path::Path;

use crate::diagnostics::Diagnostic;

pub use types::*;

/// A compiler able to build a reference manifest.
pub trait CompilerBackend: Send + Sync {
  /// Short name used in logs.
  fn name(&self) -> &str;

  /// Version string reported by the compiler.
  fn version(&self) -> Result<String, BackendError>;

  /// Open the reference graph rooted at `manifest_path`.
  fn open(&self, manifest_path: &Path) -> Result<Box<dyn InvalidatedGraph>, BackendError>;
}

/// Projects due for compilation, in dependency order.
pub trait InvalidatedGraph {
  /// The next project to build, or `None` when the graph is exhausted.
  ///
  /// Up-to-date projects may be skipped entirely.
  fn next_unit(&mut self) -> Option<Box<dyn BuildUnit>>;
}

/// One project handed out by an [`InvalidatedGraph`].
pub trait BuildUnit {
  /// Absolute path of the project's config, as referenced by the manifest.
  fn config_path(&self) -> &Path;

  /// Compile the project and return every diagnostic it produced.
  fn complete(self: Box<Self>) -> Vec<Diagnostic>;
}
