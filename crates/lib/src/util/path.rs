//! Lexical path helpers.
//!
//! Synthesized configs reference paths that may not exist yet (output
//! directories, glob patterns), so nothing here touches the filesystem.

use std::path::{Component, Path, PathBuf};

/// Collapse `.` and `..` segments without consulting the filesystem.
///
/// A `..` at the root is dropped, matching how absolute paths resolve.
pub fn normalize(path: &Path) -> PathBuf {
  let mut out = PathBuf::new();

  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        let popped = match out.components().next_back() {
          Some(Component::Normal(_)) => out.pop(),
          _ => false,
        };
        if !popped && !out.has_root() {
          out.push("..");
        }
      }
      other => out.push(other.as_os_str()),
    }
  }

  out
}

/// Resolve `value` against `base`.
///
/// Absolute values are returned unchanged; relative ones are joined onto
/// `base` and normalized.
pub fn resolve(base: &Path, value: &str) -> PathBuf {
  let candidate = Path::new(value);
  if candidate.is_absolute() {
    return candidate.to_path_buf();
  }
  normalize(&base.join(candidate))
}

/// Render a path for a JSON config value.
pub fn to_config_string(path: &Path) -> String {
  path.to_string_lossy().to_string()
}
