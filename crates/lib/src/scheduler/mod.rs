//! Sequential build loop over an invalidated project graph.
//!
//! Units are pulled one at a time; at most one component result is open at
//! any moment, so every scoped diagnostic lands on the component whose unit
//! produced it.

mod types;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::backend::InvalidatedGraph;
use crate::component::ComponentDescriptor;
use crate::consts::FILENAME_TSCONFIG;
use crate::diagnostics::{DiagnosticStyle, route};
use crate::error::{BuildError, BuildResult};
use crate::logger::{Logger, LongProcessLogger};
use crate::manifest::ConfigPathMap;
use crate::util::path::normalize;

pub use types::*;

/// Label of the long-process report emitted while building.
pub const BUILD_PROCESS_LABEL: &str = "compile components";

pub struct Scheduler<'a> {
  components: &'a [ComponentDescriptor],
  config_paths: &'a ConfigPathMap,
  logger: &'a dyn Logger,
  style: DiagnosticStyle,
}

impl<'a> Scheduler<'a> {
  pub fn new(
    components: &'a [ComponentDescriptor],
    config_paths: &'a ConfigPathMap,
    logger: &'a dyn Logger,
    style: DiagnosticStyle,
  ) -> Self {
    Self {
      components,
      config_paths,
      logger,
      style,
    }
  }

  /// Config path → owning component.
  ///
  /// A component without a synthesized config was referenced by its package
  /// directory, which the backend may report either as the directory or as
  /// the config file inside it.
  fn reverse_index(&self) -> HashMap<PathBuf, &'a ComponentDescriptor> {
    let mut index = HashMap::new();
    for component in self.components {
      match self.config_paths.get(&component.id) {
        Some(path) => {
          index.insert(normalize(path), component);
        }
        None => {
          let package_dir = normalize(&component.package_dir_abs);
          index.insert(package_dir.join(FILENAME_TSCONFIG), component);
          index.insert(package_dir, component);
        }
      }
    }
    index
  }

  /// Drain `graph`, building each unit and collecting one result per unit.
  ///
  /// Any fatal condition aborts the run and no results are returned.
  pub fn run(&self, graph: &mut dyn InvalidatedGraph) -> BuildResult<Vec<ComponentBuildResult>> {
    let index = self.reverse_index();
    let mut progress = self
      .logger
      .create_long_process_logger(BUILD_PROCESS_LABEL, self.components.len());

    let outcome = self.drain(graph, &index, progress.as_mut());
    if let Ok(results) = &outcome {
      let total: usize = results.iter().map(|r| r.errors.len()).sum();
      info!(components = results.len(), errors = total, "build loop finished");
      self.logger.info(&format!("total error found: {}", total));
    }
    progress.end();

    outcome
  }

  fn drain(
    &self,
    graph: &mut dyn InvalidatedGraph,
    index: &HashMap<PathBuf, &'a ComponentDescriptor>,
    progress: &mut dyn LongProcessLogger,
  ) -> BuildResult<Vec<ComponentBuildResult>> {
    let mut results = Vec::new();

    while let Some(unit) = graph.next_unit() {
      let config_path = normalize(unit.config_path());
      let component = lookup(index, &config_path)?;

      progress.log_progress(&component.id);
      debug!(component = %component.id, config = %config_path.display(), "building unit");

      let mut result = ComponentBuildResult::open(component.id.clone());
      for diagnostic in unit.complete() {
        let formatted = route(&diagnostic, Some(&mut result), self.style)?;
        self.logger.console_failure(&formatted);
      }

      let result = result.close();
      debug!(
        component = %result.id,
        errors = result.errors.len(),
        duration_ms = result.duration_ms(),
        "unit finished"
      );
      results.push(result);
    }

    Ok(results)
  }
}

fn lookup<'a>(
  index: &HashMap<PathBuf, &'a ComponentDescriptor>,
  config_path: &Path,
) -> BuildResult<&'a ComponentDescriptor> {
  index
    .get(config_path)
    .copied()
    .ok_or_else(|| BuildError::UnknownUnit {
      config_path: config_path.to_path_buf(),
    })
}
