//! Run-level error type.
//!
//! Everything here aborts the whole run: no partial result list is returned.
//! Failures that only affect one component never reach this type; they are
//! attached to that component's result instead.

use std::path::PathBuf;

use thiserror::Error;

use crate::backend::BackendError;
use crate::component::ComponentError;
use crate::manifest::ManifestError;
use crate::tsconfig::store::ConfigWriteError;

pub type BuildResult<T> = Result<T, BuildError>;

#[derive(Debug, Error)]
pub enum BuildError {
  #[error("invalid component list: {0}")]
  InvalidComponents(#[from] ComponentError),

  #[error(transparent)]
  ConfigWrite(#[from] ConfigWriteError),

  #[error(transparent)]
  Manifest(#[from] ManifestError),

  #[error("compiler backend failed: {0}")]
  Backend(#[from] BackendError),

  /// A diagnostic not tied to any file, such as a broken project config.
  #[error("{message}")]
  General { message: String },

  /// A file diagnostic arrived while no component was being built.
  #[error("no component build in progress for diagnostic in {file}")]
  NoOpenResult { file: PathBuf },

  /// The backend produced a unit that matches no component.
  #[error("unable to find component for {config_path}")]
  UnknownUnit { config_path: PathBuf },
}

impl BuildError {
  /// Whether this error came from the compiler rather than from the orchestration.
  pub fn is_compilation_failure(&self) -> bool {
    matches!(self, Self::General { .. })
  }
}
