use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Component id → absolute path of its synthesized config.
///
/// Built when configs are written and handed to the scheduler, which uses it
/// to map each build unit back to its component.
pub type ConfigPathMap = BTreeMap<String, PathBuf>;

/// The synthetic root config.
///
/// # Example
///
/// ```json
/// {
///   "files": [],
///   "references": [
///     { "path": "/ws/node_modules/.cache/compbuild/typescript/ui_button/dist.tsconfig.json" }
///   ]
/// }
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceManifest {
  /// Always empty: the manifest compiles nothing itself.
  pub files: Vec<PathBuf>,
  pub references: Vec<ProjectReference>,
}

/// One project reference: a config file, or a directory containing `tsconfig.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectReference {
  pub path: PathBuf,
}

/// Errors while persisting or reading the manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
  #[error("failed to write manifest at {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to read manifest at {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("invalid manifest: {0}")]
  Serde(#[from] serde_json::Error),
}
