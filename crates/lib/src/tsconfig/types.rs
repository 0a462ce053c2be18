use std::collections::BTreeMap;
use std::path::PathBuf;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::consts::{DEFAULT_BUILD_IGNORE_PATTERNS, DEFAULT_DIST_DIRNAME};

/// Key holding the nested compiler options.
pub const COMPILER_OPTIONS: &str = "compilerOptions";

/// Compiler option fixing the output-module format.
pub const MODULE_OPTION: &str = "module";

/// A synthesized, fully absolute config document for one component.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildUnitConfig {
  /// The config document as written to disk.
  pub document: Map<String, Value>,
  /// Absolute output directory (`compilerOptions.outDir`).
  pub out_dir_abs: PathBuf,
  /// Absolute source root (`compilerOptions.rootDir`).
  pub root_dir_abs: PathBuf,
}

impl BuildUnitConfig {
  /// The `include` entries.
  pub fn include(&self) -> Vec<&str> {
    string_array(self.document.get("include"))
  }

  /// The `exclude` entries.
  pub fn exclude(&self) -> Vec<&str> {
    string_array(self.document.get("exclude"))
  }

  /// The nested `compilerOptions` map, if present.
  pub fn compiler_options(&self) -> Option<&Map<String, Value>> {
    self.document.get(COMPILER_OPTIONS).and_then(Value::as_object)
  }

  /// Serialize the document the way it is persisted (2-space indented JSON).
  pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&self.document)
  }
}

fn string_array(value: Option<&Value>) -> Vec<&str> {
  value
    .and_then(Value::as_array)
    .map(|items| items.iter().filter_map(Value::as_str).collect())
    .unwrap_or_default()
}

/// Outcome of synthesizing one component.
#[derive(Debug)]
pub struct Synthesis {
  pub config: BuildUnitConfig,
  /// Override file that was merged, if any.
  pub override_path: Option<PathBuf>,
  /// Set when an override file existed but could not be used. Synthesis still
  /// succeeds, as if there were no override.
  pub override_failure: Option<ConfigError>,
}

/// Inputs shared by every component synthesis in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisOptions {
  /// Output directory name, relative to each package directory.
  pub dist_dir: String,
  /// Patterns forced into `exclude`.
  pub ignore_patterns: Vec<String>,
  /// Package directory → synthesized config path, for every component in the
  /// run. Project references into a package are redirected to its config.
  pub component_configs: BTreeMap<PathBuf, PathBuf>,
}

impl Default for SynthesisOptions {
  fn default() -> Self {
    Self {
      dist_dir: DEFAULT_DIST_DIRNAME.to_string(),
      ignore_patterns: DEFAULT_BUILD_IGNORE_PATTERNS.iter().map(|p| p.to_string()).collect(),
      component_configs: BTreeMap::new(),
    }
  }
}

/// Errors while reading or flattening a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("{path} must contain a JSON object")]
  NotAnObject { path: PathBuf },

  #[error("{path}: `extends` must be a string or an array of strings")]
  InvalidExtends { path: PathBuf },

  #[error("{path}: cannot resolve extended config '{specifier}'")]
  ExtendsNotFound { path: PathBuf, specifier: String },

  #[error("circular `extends` chain through {path}")]
  ExtendsCycle { path: PathBuf },
}
