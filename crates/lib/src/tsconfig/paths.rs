//! Absolutization of path-valued config fields.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::consts::{FILENAME_TSCONFIG, FILENAME_TSCONFIG_BUILD};
use crate::util::path::{normalize, resolve, to_config_string};

use super::types::COMPILER_OPTIONS;

/// Top-level fields holding paths or path lists.
const TOP_LEVEL_PATH_FIELDS: &[&str] = &["include", "exclude", "files"];

/// `compilerOptions` fields holding paths, path lists, or maps of path lists.
const COMPILER_OPTION_PATH_FIELDS: &[&str] = &[
  "baseUrl",
  "paths",
  "typeRoots",
  "rootDirs",
  "outDir",
  "rootDir",
  "declarationDir",
];

/// Rewrite every known path field of `document` to be absolute against `base`.
///
/// Project `references[].path` entries are included: the document is read
/// from the cache directory, not from where it was written.
///
/// Strings are resolved, arrays are resolved element-wise, and objects (such
/// as `paths`) are walked recursively. Values that are already absolute are
/// left as they are.
pub fn absolutize(document: &mut Map<String, Value>, base: &Path) {
  for field in TOP_LEVEL_PATH_FIELDS {
    if let Some(value) = document.get_mut(*field) {
      absolutize_value(value, base);
    }
  }

  if let Some(Value::Array(references)) = document.get_mut("references") {
    for reference in references.iter_mut() {
      if let Some(path) = reference.get_mut("path") {
        absolutize_value(path, base);
      }
    }
  }

  if let Some(options) = document.get_mut(COMPILER_OPTIONS).and_then(Value::as_object_mut) {
    for field in COMPILER_OPTION_PATH_FIELDS {
      if let Some(value) = options.get_mut(*field) {
        absolutize_value(value, base);
      }
    }
  }
}

fn absolutize_value(value: &mut Value, base: &Path) {
  match value {
    Value::String(s) => *s = to_config_string(&resolve(base, s)),
    Value::Array(items) => {
      for item in items.iter_mut() {
        if let Value::String(s) = item {
          *s = to_config_string(&resolve(base, s));
        }
      }
    }
    Value::Object(map) => {
      for nested in map.values_mut() {
        absolutize_value(nested, base);
      }
    }
    _ => {}
  }
}

/// Point project references at synthesized configs.
///
/// A reference to a package directory in `targets`, or to the
/// `tsconfig.json`/`tsconfig.build.json` inside one, is replaced with that
/// package's synthesized config. Other references are left alone. Expects
/// absolute reference paths.
pub fn redirect_references(document: &mut Map<String, Value>, targets: &BTreeMap<PathBuf, PathBuf>) {
  if targets.is_empty() {
    return;
  }
  let Some(Value::Array(references)) = document.get_mut("references") else {
    return;
  };

  for reference in references.iter_mut() {
    let Some(Value::String(path)) = reference.get_mut("path") else {
      continue;
    };
    if let Some(config) = reference_target(Path::new(path.as_str()), targets) {
      *path = to_config_string(config);
    }
  }
}

fn reference_target<'a>(path: &Path, targets: &'a BTreeMap<PathBuf, PathBuf>) -> Option<&'a PathBuf> {
  let path = normalize(path);
  if let Some(config) = targets.get(&path) {
    return Some(config);
  }

  let is_package_config = path
    .file_name()
    .is_some_and(|name| name == FILENAME_TSCONFIG || name == FILENAME_TSCONFIG_BUILD);
  if is_package_config {
    return path.parent().and_then(|dir| targets.get(dir));
  }
  None
}
