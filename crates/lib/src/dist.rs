//! Source to output path mapping.
//!
//! Only compile-eligible files are emitted under the output directory with a
//! `.js` extension; everything else is copied as-is and keeps its path.

use std::path::{Path, PathBuf};

use crate::consts::OUTPUT_EXTENSION;

const PRIMARY_EXTENSIONS: &[&str] = &[".ts", ".tsx"];
const DECLARATION_SUFFIX: &str = ".d.ts";

/// Decides which files are compiled and where their output lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistMapper {
  dist_dir: PathBuf,
  compile_js: bool,
  compile_jsx: bool,
}

impl DistMapper {
  pub fn new(dist_dir: impl Into<PathBuf>) -> Self {
    Self {
      dist_dir: dist_dir.into(),
      compile_js: false,
      compile_jsx: false,
    }
  }

  /// Also compile `.js` files.
  pub fn with_compile_js(mut self, compile_js: bool) -> Self {
    self.compile_js = compile_js;
    self
  }

  /// Also compile `.jsx` files.
  pub fn with_compile_jsx(mut self, compile_jsx: bool) -> Self {
    self.compile_jsx = compile_jsx;
    self
  }

  pub fn dist_dir(&self) -> &Path {
    &self.dist_dir
  }

  /// Whether the compiler handles `path`.
  ///
  /// `.ts` and `.tsx` always qualify, `.js` and `.jsx` only when enabled.
  /// Declaration files (`.d.ts`) never do: they describe emitted output
  /// rather than produce any.
  pub fn is_compile_eligible(&self, path: &Path) -> bool {
    let name = path.to_string_lossy();
    if name.ends_with(DECLARATION_SUFFIX) {
      return false;
    }

    PRIMARY_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
      || (self.compile_js && name.ends_with(".js"))
      || (self.compile_jsx && name.ends_with(".jsx"))
  }

  /// Output path of `src_path`, relative like its input.
  ///
  /// `widget/index.ts` maps to `dist/widget/index.js`; ineligible paths are
  /// returned unchanged.
  pub fn dist_path_for(&self, src_path: &Path) -> PathBuf {
    if !self.is_compile_eligible(src_path) {
      return src_path.to_path_buf();
    }
    self.dist_dir.join(src_path.with_extension(OUTPUT_EXTENSION))
  }
}
