use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A component to build, as resolved by the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDescriptor {
  /// Unique, non-empty component id (e.g. `ui/button`).
  pub id: String,
  /// Source root, relative to the workspace.
  pub root_dir: PathBuf,
  /// Absolute package directory. Override files and outputs live here.
  pub package_dir_abs: PathBuf,
  /// Absolute workspace directory.
  pub workspace_path_abs: PathBuf,
}

impl ComponentDescriptor {
  /// Absolute source root of the component.
  pub fn root_dir_abs(&self) -> PathBuf {
    self.workspace_path_abs.join(&self.root_dir)
  }

  /// Absolute output directory for the given dist directory name.
  pub fn out_dir_abs(&self, dist_dir: &str) -> PathBuf {
    self.package_dir_abs.join(dist_dir)
  }

  /// Directory name used for this component's cache entries.
  pub fn fs_compatible_id(&self) -> String {
    fs_compatible(&self.id)
  }
}

/// Errors raised when the supplied component list is not usable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComponentError {
  #[error("component id must not be empty (root dir: {root_dir})")]
  EmptyId { root_dir: String },

  #[error("duplicate component id: {0}")]
  DuplicateId(String),

  #[error("component ids {first} and {second} map to the same cache directory {dir_name}")]
  CacheNameCollision {
    first: String,
    second: String,
    dir_name: String,
  },
}

/// Replace characters that cannot appear in a single path segment.
///
/// Scoped ids such as `@scope/button` become `@scope_button`.
pub fn fs_compatible(id: &str) -> String {
  id.chars()
    .map(|c| match c {
      '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
      c if c.is_control() => '_',
      c => c,
    })
    .collect()
}

/// Check ids are non-empty, unique, and map to distinct cache directories.
pub fn validate_components(components: &[ComponentDescriptor]) -> Result<(), ComponentError> {
  let mut by_dir_name: HashMap<String, &str> = HashMap::new();

  for component in components {
    if component.id.trim().is_empty() {
      return Err(ComponentError::EmptyId {
        root_dir: component.root_dir.display().to_string(),
      });
    }

    let dir_name = component.fs_compatible_id();
    if let Some(existing) = by_dir_name.insert(dir_name.clone(), &component.id) {
      if existing == component.id {
        return Err(ComponentError::DuplicateId(component.id.clone()));
      }
      return Err(ComponentError::CacheNameCollision {
        first: existing.to_string(),
        second: component.id.clone(),
        dir_name,
      });
    }
  }

  Ok(())
}
