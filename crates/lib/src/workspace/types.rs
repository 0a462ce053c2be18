use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::process::ProcessSettings;
use crate::compiler::CompilerOptions;
use crate::consts::DEFAULT_COMPILER_ID;

/// Contents of the workspace settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkspaceConfig {
  /// Cache root, relative to the workspace unless absolute.
  pub cache_dir: Option<PathBuf>,
  pub compiler: CompilerSettings,
  pub backend: ProcessSettings,
  /// Components in build order.
  pub components: Vec<ComponentEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerSettings {
  #[serde(default = "default_compiler_id")]
  pub id: String,
  #[serde(flatten)]
  pub options: CompilerOptions,
}

impl Default for CompilerSettings {
  fn default() -> Self {
    Self {
      id: default_compiler_id(),
      options: CompilerOptions::default(),
    }
  }
}

fn default_compiler_id() -> String {
  DEFAULT_COMPILER_ID.to_string()
}

/// One component as declared in the settings file. Paths are relative to the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentEntry {
  pub id: String,
  pub root_dir: PathBuf,
  pub package_dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum WorkspaceError {
  #[error("workspace directory not found: {path}")]
  NotFound {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to read {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("invalid settings in {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },
}
