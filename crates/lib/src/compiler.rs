//! Compiler facade: the entry point a build pipeline drives.
//!
//! A run is two phases. [`Compiler::pre_build`] synthesizes and writes one
//! config per component; [`Compiler::build`] writes the reference manifest
//! over those configs, opens it with a backend and runs the scheduler.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::backend::CompilerBackend;
use crate::component::{ComponentDescriptor, validate_components};
use crate::consts::{DEFAULT_BUILD_IGNORE_PATTERNS, DEFAULT_DIST_DIRNAME};
use crate::diagnostics::DiagnosticStyle;
use crate::dist::DistMapper;
use crate::error::BuildResult;
use crate::logger::Logger;
use crate::manifest::{ConfigPathMap, build_manifest, write_manifest};
use crate::scheduler::{ComponentBuildResult, Scheduler};
use crate::tsconfig::{COMPILER_OPTIONS, SynthesisOptions, write_component_configs};

/// Human-readable compiler name.
pub const DISPLAY_NAME: &str = "TypeScript";

/// User-facing compiler options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompilerOptions {
  /// Base config template every component config starts from.
  pub tsconfig: Map<String, Value>,
  /// Output directory name, relative to each package directory.
  pub dist_dir: String,
  /// Name of the published artifact.
  pub artifact_name: String,
  pub compile_js: bool,
  pub compile_jsx: bool,
  /// Patterns excluded from every component.
  pub ignore_patterns: Vec<String>,
  /// Maximum concurrent config writes.
  pub parallelism: usize,
}

impl Default for CompilerOptions {
  fn default() -> Self {
    let mut tsconfig = Map::new();
    tsconfig.insert(COMPILER_OPTIONS.to_string(), Value::Object(Map::new()));

    Self {
      tsconfig,
      dist_dir: DEFAULT_DIST_DIRNAME.to_string(),
      artifact_name: DEFAULT_DIST_DIRNAME.to_string(),
      compile_js: false,
      compile_jsx: false,
      ignore_patterns: DEFAULT_BUILD_IGNORE_PATTERNS.iter().map(|p| p.to_string()).collect(),
      parallelism: std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4),
    }
  }
}

impl CompilerOptions {
  pub fn synthesis_options(&self) -> SynthesisOptions {
    SynthesisOptions {
      dist_dir: self.dist_dir.clone(),
      ignore_patterns: self.ignore_patterns.clone(),
      ..Default::default()
    }
  }

  pub fn dist_mapper(&self) -> DistMapper {
    DistMapper::new(&self.dist_dir)
      .with_compile_js(self.compile_js)
      .with_compile_jsx(self.compile_jsx)
  }
}

/// Inputs of one build invocation.
#[derive(Debug, Clone)]
pub struct BuildContext {
  pub workspace_path: PathBuf,
  /// Components in build order.
  pub components: Vec<ComponentDescriptor>,
  /// Scratch directory owned by this run.
  pub cache_root: PathBuf,
}

/// Results of [`Compiler::build`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildTaskResult {
  pub components_results: Vec<ComponentBuildResult>,
}

impl BuildTaskResult {
  pub fn total_errors(&self) -> usize {
    self.components_results.iter().map(|r| r.errors.len()).sum()
  }

  pub fn has_errors(&self) -> bool {
    self.total_errors() > 0
  }
}

pub struct Compiler {
  id: String,
  options: CompilerOptions,
  logger: Arc<dyn Logger>,
  style: DiagnosticStyle,
  config_paths: ConfigPathMap,
}

impl Compiler {
  pub fn new(id: impl Into<String>, options: CompilerOptions, logger: Arc<dyn Logger>) -> Self {
    Self {
      id: id.into(),
      options,
      logger,
      style: DiagnosticStyle::default(),
      config_paths: ConfigPathMap::new(),
    }
  }

  /// Set how diagnostics are formatted.
  pub fn with_style(mut self, style: DiagnosticStyle) -> Self {
    self.style = style;
    self
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn display_name(&self) -> &'static str {
    DISPLAY_NAME
  }

  pub fn options(&self) -> &CompilerOptions {
    &self.options
  }

  pub fn version(&self, backend: &dyn CompilerBackend) -> BuildResult<String> {
    Ok(backend.version()?)
  }

  /// The base template, pretty-printed.
  pub fn display_config(&self) -> String {
    format!("{:#}", Value::Object(self.options.tsconfig.clone()))
  }

  pub fn dist_dir(&self) -> &str {
    &self.options.dist_dir
  }

  pub fn artifact_name(&self) -> &str {
    &self.options.artifact_name
  }

  /// Output path for a source path, relative paths in, relative paths out.
  pub fn dist_path_by_src_path(&self, src_path: &Path) -> PathBuf {
    self.options.dist_mapper().dist_path_for(src_path)
  }

  pub fn is_file_supported(&self, path: &Path) -> bool {
    self.options.dist_mapper().is_compile_eligible(path)
  }

  /// Config paths written by the last [`Compiler::pre_build`].
  pub fn config_paths(&self) -> &ConfigPathMap {
    &self.config_paths
  }

  /// Write one synthesized config per component.
  pub async fn pre_build(&mut self, ctx: &BuildContext) -> BuildResult<&ConfigPathMap> {
    validate_components(&ctx.components)?;

    let config_paths = write_component_configs(
      &ctx.components,
      &self.options.tsconfig,
      &self.options.synthesis_options(),
      &ctx.cache_root,
      self.options.parallelism,
      Arc::clone(&self.logger),
    )
    .await?;

    info!(compiler = %self.id, configs = config_paths.len(), "component configs ready");
    self.config_paths = config_paths;
    Ok(&self.config_paths)
  }

  /// Build every out-of-date component.
  ///
  /// Components that were not pre-built are referenced by package directory.
  pub fn build(&self, ctx: &BuildContext, backend: &dyn CompilerBackend) -> BuildResult<BuildTaskResult> {
    if ctx.components.is_empty() {
      self.logger.debug("no components to build");
      return Ok(BuildTaskResult::default());
    }

    let manifest = build_manifest(&ctx.components, &self.config_paths);
    let manifest_path = write_manifest(&ctx.cache_root, &manifest)?;

    self.logger.info(&format!(
      "building {} components with {}",
      ctx.components.len(),
      backend.name()
    ));
    let mut graph = backend.open(&manifest_path)?;

    let scheduler = Scheduler::new(&ctx.components, &self.config_paths, self.logger.as_ref(), self.style);
    let components_results = scheduler.run(graph.as_mut())?;

    Ok(BuildTaskResult { components_results })
  }
}
