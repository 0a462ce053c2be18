//! Project reference graph discovery and fingerprinting.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::consts::FILENAME_TSCONFIG;
use crate::manifest::read_manifest;
use crate::tsconfig::COMPILER_OPTIONS;
use crate::tsconfig::load::read_config;
use crate::util::hash::{ContentHash, TreeHashError, hash_bytes, hash_tree};
use crate::util::path::{normalize, resolve};

use super::BackendError;

/// A project discovered through the manifest's references.
#[derive(Debug, Clone)]
pub(crate) struct Project {
  pub config_path: PathBuf,
  pub config: Map<String, Value>,
  /// Config paths of the projects this one references.
  pub references: Vec<PathBuf>,
}

impl Project {
  fn dir(&self) -> &Path {
    self.config_path.parent().unwrap_or(Path::new("."))
  }

  fn compiler_option(&self, key: &str) -> Option<&str> {
    self
      .config
      .get(COMPILER_OPTIONS)
      .and_then(Value::as_object)
      .and_then(|options| options.get(key))
      .and_then(Value::as_str)
  }

  /// Directories and files whose contents feed the project.
  ///
  /// Each `include` pattern contributes its longest literal prefix. Without
  /// `include`, the whole config directory is an input.
  pub fn input_roots(&self) -> Vec<PathBuf> {
    let patterns: Vec<&str> = self
      .config
      .get("include")
      .and_then(Value::as_array)
      .map(|items| items.iter().filter_map(Value::as_str).collect())
      .unwrap_or_default();

    if patterns.is_empty() {
      return vec![self.dir().to_path_buf()];
    }

    patterns.into_iter().map(|pattern| literal_prefix(self.dir(), pattern)).collect()
  }

  /// Directories written by the compiler, excluded from the fingerprint.
  pub fn output_dirs(&self) -> Vec<PathBuf> {
    ["outDir", "declarationDir"]
      .iter()
      .filter_map(|key| self.compiler_option(key))
      .map(|dir| resolve(self.dir(), dir))
      .collect()
  }

  /// Fingerprint over the config file and every input file.
  pub fn fingerprint(&self) -> Result<ContentHash, TreeHashError> {
    let tree = hash_tree(&self.input_roots(), &self.output_dirs())?;
    let config = serde_json::to_string(&self.config).unwrap_or_default();
    let mut data = Vec::new();
    data.extend_from_slice(self.config_path.to_string_lossy().as_bytes());
    data.push(b'\n');
    data.extend_from_slice(config.as_bytes());
    data.push(b'\n');
    data.extend_from_slice(tree.0.as_bytes());
    Ok(hash_bytes(&data))
  }
}

/// Everything before the first path segment containing a glob character.
fn literal_prefix(base: &Path, pattern: &str) -> PathBuf {
  let literal: Vec<&str> = pattern
    .split('/')
    .take_while(|segment| !segment.contains(['*', '?', '[', '{']))
    .collect();
  let joined = literal.join("/");
  if joined.is_empty() {
    if pattern.starts_with('/') {
      return PathBuf::from("/");
    }
    return base.to_path_buf();
  }
  resolve(base, &joined)
}

/// Turn a reference target into a config file path.
///
/// A directory means the `tsconfig.json` inside it.
fn reference_target(path: &Path) -> PathBuf {
  if path.is_dir() {
    path.join(FILENAME_TSCONFIG)
  } else {
    path.to_path_buf()
  }
}

fn references_of(config: &Map<String, Value>, dir: &Path) -> Vec<PathBuf> {
  config
    .get("references")
    .and_then(Value::as_array)
    .map(|refs| {
      refs
        .iter()
        .filter_map(|r| r.get("path").and_then(Value::as_str))
        .map(|p| reference_target(&resolve(dir, p)))
        .collect()
    })
    .unwrap_or_default()
}

/// Discover every project reachable from the manifest and order them so that
/// each project comes after everything it references.
pub(crate) fn discover(manifest_path: &Path) -> Result<Vec<Project>, BackendError> {
  let manifest = read_manifest(manifest_path)?;
  let mut queue: VecDeque<PathBuf> = manifest
    .references
    .iter()
    .map(|r| reference_target(&normalize(&r.path)))
    .collect();

  let mut projects: Vec<Project> = Vec::new();
  let mut index: HashMap<PathBuf, usize> = HashMap::new();

  while let Some(config_path) = queue.pop_front() {
    if index.contains_key(&config_path) {
      continue;
    }
    if !config_path.is_file() {
      return Err(BackendError::MissingProject { path: config_path });
    }

    let config = read_config(&config_path)?;
    let dir = config_path.parent().unwrap_or(Path::new(".")).to_path_buf();
    let references = references_of(&config, &dir);
    trace!(config = %config_path.display(), references = references.len(), "discovered project");

    queue.extend(references.iter().cloned());
    index.insert(config_path.clone(), projects.len());
    projects.push(Project {
      config_path,
      config,
      references,
    });
  }

  let order = topological_order(&projects, &index)?;
  debug!(projects = order.len(), "ordered project graph");

  let mut slots: Vec<Option<Project>> = projects.into_iter().map(Some).collect();
  Ok(order.into_iter().filter_map(|i| slots[i].take()).collect())
}

fn topological_order(projects: &[Project], index: &HashMap<PathBuf, usize>) -> Result<Vec<usize>, BackendError> {
  let mut graph: DiGraph<usize, ()> = DiGraph::new();
  let nodes: Vec<NodeIndex> = (0..projects.len()).map(|i| graph.add_node(i)).collect();

  for (i, project) in projects.iter().enumerate() {
    for reference in &project.references {
      if let Some(&dep) = index.get(reference) {
        // Edge from dependency to dependent
        graph.add_edge(nodes[dep], nodes[i], ());
      }
    }
  }

  let sorted = toposort(&graph, None).map_err(|_| BackendError::Cycle)?;
  Ok(sorted.into_iter().map(|idx| graph[idx]).collect())
}

#[cfg(test)]
#[cfg(not(windows))]
mod tests {
  use super::*;
  use std::fs;

  use crate::manifest::{ProjectReference, ReferenceManifest, write_manifest};

  fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
  }

  fn manifest(root: &Path, refs: &[PathBuf]) -> PathBuf {
    let manifest = ReferenceManifest {
      files: Vec::new(),
      references: refs.iter().map(|p| ProjectReference { path: p.clone() }).collect(),
    };
    write_manifest(root, &manifest).unwrap()
  }

  #[test]
  fn orders_dependencies_first() {
    let temp = tempfile::tempdir().unwrap();
    let app = temp.path().join("app/tsconfig.json");
    let lib = temp.path().join("lib/tsconfig.json");
    write(&app, r#"{ "references": [{ "path": "../lib" }] }"#);
    write(&lib, "{}");

    let path = manifest(&temp.path().join("cache"), &[app.clone(), lib.clone()]);
    let order: Vec<PathBuf> = discover(&path).unwrap().into_iter().map(|p| p.config_path).collect();

    assert_eq!(order, vec![lib, app]);
  }

  #[test]
  fn follows_transitive_references() {
    let temp = tempfile::tempdir().unwrap();
    let app = temp.path().join("app/tsconfig.json");
    let shared = temp.path().join("shared/base.json");
    write(&app, r#"{ "references": [{ "path": "../shared/base.json" }] }"#);
    write(&shared, "{}");

    let path = manifest(&temp.path().join("cache"), &[app.clone()]);
    let order: Vec<PathBuf> = discover(&path).unwrap().into_iter().map(|p| p.config_path).collect();

    assert_eq!(order, vec![shared, app]);
  }

  #[test]
  fn directory_reference_means_tsconfig_inside() {
    let temp = tempfile::tempdir().unwrap();
    let pkg = temp.path().join("pkg");
    write(&pkg.join("tsconfig.json"), "{}");

    let path = manifest(&temp.path().join("cache"), &[pkg.clone()]);
    let projects = discover(&path).unwrap();

    assert_eq!(projects[0].config_path, pkg.join("tsconfig.json"));
  }

  #[test]
  fn reference_cycle_is_rejected() {
    let temp = tempfile::tempdir().unwrap();
    let a = temp.path().join("a/tsconfig.json");
    let b = temp.path().join("b/tsconfig.json");
    write(&a, r#"{ "references": [{ "path": "../b/tsconfig.json" }] }"#);
    write(&b, r#"{ "references": [{ "path": "../a/tsconfig.json" }] }"#);

    let path = manifest(&temp.path().join("cache"), &[a]);
    assert!(matches!(discover(&path), Err(BackendError::Cycle)));
  }

  #[test]
  fn missing_project_is_reported() {
    let temp = tempfile::tempdir().unwrap();
    let missing = temp.path().join("gone/tsconfig.json");

    let path = manifest(&temp.path().join("cache"), &[missing.clone()]);
    assert!(matches!(discover(&path), Err(BackendError::MissingProject { path }) if path == missing));
  }

  #[test]
  fn fingerprint_ignores_output_dir() {
    let temp = tempfile::tempdir().unwrap();
    let config = temp.path().join("pkg/tsconfig.json");
    write(
      &config,
      r#"{ "include": ["src/**/*"], "compilerOptions": { "outDir": "src/dist" } }"#,
    );
    write(&temp.path().join("pkg/src/index.ts"), "export const a = 1;");

    let path = manifest(&temp.path().join("cache"), &[config]);
    let project = discover(&path).unwrap().remove(0);
    let before = project.fingerprint().unwrap();

    write(&temp.path().join("pkg/src/dist/index.js"), "exports.a = 1;");
    assert_eq!(project.fingerprint().unwrap(), before);

    write(&temp.path().join("pkg/src/index.ts"), "export const a = 2;");
    assert_ne!(project.fingerprint().unwrap(), before);
  }

  #[test]
  fn literal_prefix_stops_at_glob() {
    let base = Path::new("/ws/pkg");
    assert_eq!(literal_prefix(base, "src/**/*"), PathBuf::from("/ws/pkg/src"));
    assert_eq!(literal_prefix(base, "/abs/src/*.ts"), PathBuf::from("/abs/src"));
    assert_eq!(literal_prefix(base, "**/*.ts"), PathBuf::from("/ws/pkg"));
  }
}
