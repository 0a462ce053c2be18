//! Workspace settings and path resolution.
//!
//! A workspace is a directory holding a settings file that declares the
//! compiler options, the compiler executable and the components to build.
//! A missing settings file is not an error: every section has defaults and
//! the component list is simply empty.
//!
//! # Cache root
//!
//! Resolved in order, then suffixed with the compiler id:
//!
//! 1. `COMPBUILD_CACHE_DIR`
//! 2. `cacheDir` from the settings file
//! 3. `<workspace>/node_modules/.cache/compbuild`

mod types;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::backend::process::{ProcessBackend, ProcessSettings};
use crate::compiler::{BuildContext, Compiler};
use crate::component::ComponentDescriptor;
use crate::consts::{APP_NAME, CACHE_DIR_ENV, SETTINGS_FILENAME};
use crate::logger::Logger;
use crate::tsconfig::jsonc;
use crate::util::path::normalize;

pub use types::*;

#[derive(Debug, Clone)]
pub struct Workspace {
  root: PathBuf,
  config: WorkspaceConfig,
}

impl Workspace {
  /// Load the workspace rooted at `root`.
  pub fn load(root: &Path) -> Result<Self, WorkspaceError> {
    let root = dunce::canonicalize(root).map_err(|source| WorkspaceError::NotFound {
      path: root.to_path_buf(),
      source,
    })?;
    let path = root.join(SETTINGS_FILENAME);

    let config = if path.is_file() {
      debug!(path = %path.display(), "loading workspace settings");
      let text = fs::read_to_string(&path).map_err(|source| WorkspaceError::Read {
        path: path.clone(),
        source,
      })?;
      serde_json::from_str(&jsonc::strip(&text)).map_err(|source| WorkspaceError::Parse {
        path: path.clone(),
        source,
      })?
    } else {
      debug!(path = %path.display(), "no workspace settings, using defaults");
      WorkspaceConfig::default()
    };

    Ok(Self { root, config })
  }

  /// Build a workspace from already-parsed settings.
  pub fn from_config(root: impl Into<PathBuf>, config: WorkspaceConfig) -> Self {
    Self {
      root: root.into(),
      config,
    }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn config(&self) -> &WorkspaceConfig {
    &self.config
  }

  /// Declared components, with absolute package directories.
  pub fn components(&self) -> Vec<ComponentDescriptor> {
    self
      .config
      .components
      .iter()
      .map(|entry| ComponentDescriptor {
        id: entry.id.clone(),
        root_dir: entry.root_dir.clone(),
        package_dir_abs: normalize(&self.root.join(&entry.package_dir)),
        workspace_path_abs: self.root.clone(),
      })
      .collect()
  }

  /// Scratch directory for this workspace and compiler.
  pub fn cache_root(&self) -> PathBuf {
    let base = match std::env::var(CACHE_DIR_ENV) {
      Ok(dir) if !dir.is_empty() => self.root.join(dir),
      _ => match &self.config.cache_dir {
        Some(dir) => self.root.join(dir),
        None => self.root.join("node_modules").join(".cache").join(APP_NAME),
      },
    };
    normalize(&base.join(&self.config.compiler.id))
  }

  pub fn build_context(&self) -> BuildContext {
    BuildContext {
      workspace_path: self.root.clone(),
      components: self.components(),
      cache_root: self.cache_root(),
    }
  }

  pub fn compiler(&self, logger: Arc<dyn Logger>) -> Compiler {
    Compiler::new(&self.config.compiler.id, self.config.compiler.options.clone(), logger)
  }

  /// Compiler invocation settings, running in the workspace root.
  pub fn process_settings(&self) -> ProcessSettings {
    ProcessSettings {
      working_dir: self.root.clone(),
      ..self.config.backend.clone()
    }
  }

  pub fn backend(&self) -> ProcessBackend {
    ProcessBackend::new(self.process_settings())
  }
}
