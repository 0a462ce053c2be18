//! Package-level override files.
//!
//! A package may carry its own config, looked up as `tsconfig.json` and then
//! `tsconfig.build.json`; the first one present is used and the other is
//! ignored. Before merging, its `extends` chain is flattened into a single
//! document so that nothing in the result depends on where it is written.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;

use crate::consts::{FILENAME_TSCONFIG, FILENAME_TSCONFIG_BUILD};
use crate::util::path::{normalize, resolve};

use super::jsonc;
use super::paths::absolutize;
use super::types::{COMPILER_OPTIONS, ConfigError};

/// Find the override file for a package, in priority order.
pub fn find_override(package_dir: &Path) -> Option<PathBuf> {
  [FILENAME_TSCONFIG, FILENAME_TSCONFIG_BUILD]
    .iter()
    .map(|name| package_dir.join(name))
    .find(|path| path.is_file())
}

/// Locate and flatten a package's override file.
///
/// Returns `Ok(None)` when the package has no override file.
pub fn load_override(package_dir: &Path) -> Result<Option<(PathBuf, Map<String, Value>)>, ConfigError> {
  let Some(path) = find_override(package_dir) else {
    return Ok(None);
  };
  debug!(path = %path.display(), "loading package override");
  let document = flatten(&path)?;
  Ok(Some((path, document)))
}

/// Read one config file as a JSON object.
pub fn read_config(path: &Path) -> Result<Map<String, Value>, ConfigError> {
  let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
    path: path.to_path_buf(),
    source,
  })?;
  match jsonc::parse(&text) {
    Ok(Value::Object(map)) => Ok(map),
    Ok(_) => Err(ConfigError::NotAnObject {
      path: path.to_path_buf(),
    }),
    Err(source) => Err(ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    }),
  }
}

/// Read a config file with its `extends` chain folded in.
///
/// Fields inherited from a base keep pointing where the base meant them to:
/// their paths are made absolute against the base's own directory. The
/// extending file's own fields are returned as written.
pub fn flatten(path: &Path) -> Result<Map<String, Value>, ConfigError> {
  let mut stack = Vec::new();
  flatten_inner(path, &mut stack)
}

fn flatten_inner(path: &Path, stack: &mut Vec<PathBuf>) -> Result<Map<String, Value>, ConfigError> {
  let key = normalize(path);
  if stack.contains(&key) {
    return Err(ConfigError::ExtendsCycle { path: key });
  }
  stack.push(key);

  let mut document = read_config(path)?;
  let bases = extends_specifiers(document.remove("extends"), path)?;
  let dir = path.parent().unwrap_or(Path::new("."));

  let mut flattened = Map::new();
  for specifier in bases {
    let base_path = resolve_extends(dir, &specifier).ok_or_else(|| ConfigError::ExtendsNotFound {
      path: path.to_path_buf(),
      specifier: specifier.clone(),
    })?;
    let mut base = flatten_inner(&base_path, stack)?;
    absolutize(&mut base, base_path.parent().unwrap_or(Path::new(".")));
    inherit(&mut flattened, base);
  }
  inherit(&mut flattened, document);

  stack.pop();
  Ok(flattened)
}

fn extends_specifiers(value: Option<Value>, path: &Path) -> Result<Vec<String>, ConfigError> {
  let invalid = || ConfigError::InvalidExtends {
    path: path.to_path_buf(),
  };
  match value {
    None => Ok(Vec::new()),
    Some(Value::String(s)) => Ok(vec![s]),
    Some(Value::Array(items)) => items
      .into_iter()
      .map(|item| match item {
        Value::String(s) => Ok(s),
        _ => Err(invalid()),
      })
      .collect(),
    Some(_) => Err(invalid()),
  }
}

/// Layer `child` over `parent` the way `extends` does: top-level keys are
/// replaced, `compilerOptions` entries are replaced one by one.
fn inherit(parent: &mut Map<String, Value>, child: Map<String, Value>) {
  for (key, value) in child {
    let merged = match (parent.remove(&key), value) {
      (Some(Value::Object(mut existing)), Value::Object(options)) if key == COMPILER_OPTIONS => {
        existing.extend(options);
        Value::Object(existing)
      }
      (_, value) => value,
    };
    parent.insert(key, merged);
  }
}

/// Resolve an `extends` specifier relative to the directory of the file
/// that contains it. Relative and absolute specifiers are taken as paths;
/// anything else is looked up in `node_modules` directories up the tree.
fn resolve_extends(dir: &Path, specifier: &str) -> Option<PathBuf> {
  if specifier.starts_with('.') || Path::new(specifier).is_absolute() {
    return config_file_candidate(&resolve(dir, specifier));
  }

  dir
    .ancestors()
    .map(|ancestor| ancestor.join("node_modules").join(specifier))
    .find_map(|candidate| config_file_candidate(&candidate))
}

fn config_file_candidate(path: &Path) -> Option<PathBuf> {
  if path.is_file() {
    return Some(path.to_path_buf());
  }

  let mut with_ext = path.as_os_str().to_owned();
  with_ext.push(".json");
  let with_ext = PathBuf::from(with_ext);
  if with_ext.is_file() {
    return Some(with_ext);
  }

  let nested = path.join(FILENAME_TSCONFIG);
  nested.is_file().then_some(nested)
}
