//! Test utilities for compbuild-lib.

use std::fs;
use std::path::Path;

use crate::component::{ComponentDescriptor, fs_compatible};

/// Create `<workspace>/packages/<fs id>/src` and describe it as a component.
pub fn workspace_component(workspace: &Path, id: &str) -> ComponentDescriptor {
  let dir_name = fs_compatible(id);
  let package_dir = workspace.join("packages").join(&dir_name);
  fs::create_dir_all(package_dir.join("src")).unwrap();
  ComponentDescriptor {
    id: id.to_string(),
    root_dir: Path::new("packages").join(&dir_name).join("src"),
    package_dir_abs: package_dir,
    workspace_path_abs: workspace.to_path_buf(),
  }
}

/// Describe a component without touching the filesystem.
pub fn virtual_component(id: &str) -> ComponentDescriptor {
  let dir_name = fs_compatible(id);
  ComponentDescriptor {
    id: id.to_string(),
    root_dir: Path::new("packages").join(&dir_name).join("src"),
    package_dir_abs: Path::new("/ws/packages").join(&dir_name),
    workspace_path_abs: Path::new("/ws").to_path_buf(),
  }
}
