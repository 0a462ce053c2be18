use std::path::PathBuf;

use thiserror::Error;

use crate::manifest::ManifestError;
use crate::tsconfig::ConfigError;

/// Errors raised while opening a reference graph.
#[derive(Debug, Error)]
pub enum BackendError {
  #[error(transparent)]
  Manifest(#[from] ManifestError),

  #[error("failed to read project config: {0}")]
  Config(#[from] ConfigError),

  #[error("referenced project not found: {path}")]
  MissingProject { path: PathBuf },

  #[error("project references form a cycle")]
  Cycle,

  #[error("failed to run {command}: {source}")]
  Spawn {
    command: String,
    #[source]
    source: std::io::Error,
  },

  #[error("{command} exited with {status}: {stderr}")]
  Exit {
    command: String,
    status: String,
    stderr: String,
  },
}
