//! Implementation of the `compbuild configs` command.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use compbuild_lib::manifest::{build_manifest, write_manifest};

use crate::logger::ConsoleLogger;
use crate::output::{print_stat, print_success};

use super::load_workspace;

/// Write every component config and the reference manifest, then print where they went.
pub fn cmd_configs(workspace: &Path) -> Result<()> {
  let workspace = load_workspace(workspace)?;
  let ctx = workspace.build_context();
  let mut compiler = workspace.compiler(Arc::new(ConsoleLogger::new(false)));

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let config_paths = rt
    .block_on(compiler.pre_build(&ctx))
    .context("Failed to write component configs")?
    .clone();

  let manifest = build_manifest(&ctx.components, &config_paths);
  let manifest_path = write_manifest(&ctx.cache_root, &manifest).context("Failed to write reference manifest")?;

  for component in &ctx.components {
    if let Some(path) = config_paths.get(&component.id) {
      print_stat(&component.id, &path.display().to_string());
    }
  }
  print_success(&format!("Manifest written to {}", manifest_path.display()));
  Ok(())
}
