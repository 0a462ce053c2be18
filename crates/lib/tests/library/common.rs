//! Shared helpers for library integration tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use compbuild_lib::compiler::{BuildContext, Compiler, CompilerOptions};
use compbuild_lib::component::ComponentDescriptor;
use compbuild_lib::logger::MemoryLogger;
use tempfile::TempDir;

/// A throwaway workspace with components under `packages/`.
pub struct TestWorkspace {
  _temp: TempDir,
  pub components: Vec<ComponentDescriptor>,
}

impl TestWorkspace {
  pub fn new(ids: &[&str]) -> Self {
    let temp = TempDir::new().unwrap();
    let root = dunce::canonicalize(temp.path()).unwrap();
    let components = ids
      .iter()
      .map(|id| {
        let package_dir = root.join("packages").join(id);
        fs::create_dir_all(package_dir.join("src")).unwrap();
        fs::write(package_dir.join("src/index.ts"), format!("export const name = '{}';\n", id)).unwrap();
        ComponentDescriptor {
          id: id.to_string(),
          root_dir: Path::new("packages").join(id).join("src"),
          package_dir_abs: package_dir,
          workspace_path_abs: root.clone(),
        }
      })
      .collect();
    Self { _temp: temp, components }
  }

  pub fn root(&self) -> PathBuf {
    self.components[0].workspace_path_abs.clone()
  }

  pub fn package_dir(&self, id: &str) -> PathBuf {
    self.root().join("packages").join(id)
  }

  /// Write a file relative to the workspace root.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.root().join(relative_path);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
  }

  pub fn context(&self) -> BuildContext {
    BuildContext {
      workspace_path: self.root(),
      components: self.components.clone(),
      cache_root: self.root().join("node_modules/.cache/compbuild/typescript"),
    }
  }

  pub fn compiler(&self, template: serde_json::Value, logger: &MemoryLogger) -> Compiler {
    let options = CompilerOptions {
      tsconfig: template.as_object().cloned().unwrap_or_default(),
      parallelism: 2,
      ..Default::default()
    };
    Compiler::new("typescript", options, Arc::new(logger.clone()))
  }
}

pub fn read_json(path: &Path) -> serde_json::Value {
  serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}
