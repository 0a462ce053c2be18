//! Reference manifest construction.
//!
//! The manifest is a synthetic root config that compiles nothing itself
//! (`files` is empty) and lists every component's config as a project
//! reference. Handing it to the backend lets the backend discover the whole
//! reference graph and decide which projects are out of date.

mod types;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::component::ComponentDescriptor;
use crate::consts::FILENAME_TSCONFIG;

pub use types::*;

/// Assemble the manifest for `components`, in component order.
///
/// A component with no synthesized config is referenced by its package
/// directory, leaving the backend to pick up whatever config lives there.
pub fn build_manifest(components: &[ComponentDescriptor], config_paths: &ConfigPathMap) -> ReferenceManifest {
  let references = components
    .iter()
    .map(|component| {
      let path = config_paths
        .get(&component.id)
        .cloned()
        .unwrap_or_else(|| component.package_dir_abs.clone());
      ProjectReference { path }
    })
    .collect();

  ReferenceManifest {
    files: Vec::new(),
    references,
  }
}

/// Where the manifest lives under `cache_root`.
pub fn manifest_path(cache_root: &Path) -> PathBuf {
  cache_root.join(FILENAME_TSCONFIG)
}

/// Write the manifest, replacing any previous one, and return its path.
pub fn write_manifest(cache_root: &Path, manifest: &ReferenceManifest) -> Result<PathBuf, ManifestError> {
  let path = manifest_path(cache_root);
  let content = serde_json::to_string_pretty(manifest)?;

  fs::create_dir_all(cache_root).map_err(|source| ManifestError::Write {
    path: cache_root.to_path_buf(),
    source,
  })?;
  fs::write(&path, content).map_err(|source| ManifestError::Write {
    path: path.clone(),
    source,
  })?;

  info!(path = %path.display(), references = manifest.references.len(), "wrote reference manifest");
  Ok(path)
}

/// Read a manifest back, as written by [`write_manifest`].
pub fn read_manifest(path: &Path) -> Result<ReferenceManifest, ManifestError> {
  debug!(path = %path.display(), "reading reference manifest");
  let content = fs::read_to_string(path).map_err(|source| ManifestError::Read {
    path: path.to_path_buf(),
    source,
  })?;
  Ok(serde_json::from_str(&content)?)
}
