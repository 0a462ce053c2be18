//! Writing synthesized configs to the cache.
//!
//! # Layout
//!
//! ```text
//! {cache_root}/
//! ├── tsconfig.json                      # reference manifest (see `manifest`)
//! └── <fs_compatible_id>/
//!     └── <dist_dir>.tsconfig.json       # one per component
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::component::ComponentDescriptor;
use crate::consts::FILENAME_TSCONFIG;
use crate::logger::Logger;
use crate::manifest::ConfigPathMap;
use crate::util::path::normalize;

use super::synthesize::synthesize;
use super::types::SynthesisOptions;

/// One component whose config could not be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWriteFailure {
  pub component_id: String,
  pub path: PathBuf,
  pub message: String,
}

impl std::fmt::Display for ConfigWriteFailure {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{} ({}): {}", self.component_id, self.path.display(), self.message)
  }
}

/// Every failure from one [`write_component_configs`] call.
#[derive(Debug, Error)]
#[error("failed to write {} component config(s): {}", .failures.len(), join_failures(.failures))]
pub struct ConfigWriteError {
  pub failures: Vec<ConfigWriteFailure>,
}

fn join_failures(failures: &[ConfigWriteFailure]) -> String {
  failures.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// Path of a component's synthesized config under `cache_root`.
pub fn component_config_path(cache_root: &Path, component: &ComponentDescriptor, dist_dir: &str) -> PathBuf {
  cache_root
    .join(component.fs_compatible_id())
    .join(format!("{}.{}", dist_dir, FILENAME_TSCONFIG))
}

/// Synthesize and write every component's config concurrently.
///
/// At most `parallelism` components are processed at once. Every component
/// is attempted even if others fail; any failure makes the whole call fail
/// with the complete list, so callers never build a manifest that points at
/// a config that was not written.
pub async fn write_component_configs(
  components: &[ComponentDescriptor],
  template: &Map<String, Value>,
  options: &SynthesisOptions,
  cache_root: &Path,
  parallelism: usize,
  logger: Arc<dyn Logger>,
) -> Result<ConfigPathMap, ConfigWriteError> {
  info!(
    component_count = components.len(),
    cache_root = %cache_root.display(),
    "writing component configs"
  );

  let mut options = options.clone();
  options.component_configs = components
    .iter()
    .map(|c| {
      let config = component_config_path(cache_root, c, &options.dist_dir);
      (normalize(&c.package_dir_abs), config)
    })
    .collect();

  let template = Arc::new(template.clone());
  let semaphore = Arc::new(Semaphore::new(parallelism.max(1)));
  let mut join_set = JoinSet::new();

  for component in components {
    let component = component.clone();
    let template = Arc::clone(&template);
    let options = options.clone();
    let path = component_config_path(cache_root, &component, &options.dist_dir);
    let logger = Arc::clone(&logger);
    let semaphore = Arc::clone(&semaphore);

    join_set.spawn(async move {
      let result = match semaphore.acquire().await {
        Ok(_permit) => write_one(&component, &template, &options, &path, logger.as_ref()).await,
        Err(e) => Err(e.to_string()),
      };
      (component.id, path, result)
    });
  }

  let mut paths = ConfigPathMap::new();
  let mut failures = Vec::new();

  while let Some(joined) = join_set.join_next().await {
    match joined {
      Ok((id, path, Ok(()))) => {
        paths.insert(id, path);
      }
      Ok((id, path, Err(message))) => failures.push(ConfigWriteFailure {
        component_id: id,
        path,
        message,
      }),
      Err(e) => {
        error!(error = %e, "config write task panicked");
        failures.push(ConfigWriteFailure {
          component_id: "<unknown>".to_string(),
          path: cache_root.to_path_buf(),
          message: format!("task failed: {}", e),
        });
      }
    }
  }

  if !failures.is_empty() {
    failures.sort_by(|a, b| a.component_id.cmp(&b.component_id));
    for failure in &failures {
      logger.console_failure(&failure.to_string());
    }
    return Err(ConfigWriteError { failures });
  }

  Ok(paths)
}

async fn write_one(
  component: &ComponentDescriptor,
  template: &Map<String, Value>,
  options: &SynthesisOptions,
  path: &Path,
  logger: &dyn Logger,
) -> Result<(), String> {
  let synthesis = synthesize(component, template, options);
  if let Some(failure) = &synthesis.override_failure {
    logger.console_failure(&failure.to_string());
  }

  let content = synthesis.config.to_json_pretty().map_err(|e| e.to_string())?;

  if let Some(parent) = path.parent() {
    tokio::fs::create_dir_all(parent).await.map_err(|e| e.to_string())?;
  }
  tokio::fs::write(path, content).await.map_err(|e| e.to_string())?;

  debug!(component = %component.id, path = %path.display(), "wrote component config");
  Ok(())
}
