//! Implementation of the `compbuild build` command.
//!
//! Writes every component config, then builds the out-of-date components
//! through the workspace's compiler executable.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant, UNIX_EPOCH};

use anyhow::{Context, Result, bail};
use tracing::info;

use compbuild_lib::compiler::BuildTaskResult;
use compbuild_lib::diagnostics::DiagnosticStyle;

use crate::logger::ConsoleLogger;
use crate::output::{OutputFormat, format_duration, print_info, print_json, print_stat, print_success, symbols};

use super::load_workspace;

/// Execute the build command.
///
/// Fails when the run aborts or when any component reports errors.
pub fn cmd_build(workspace: &Path, output: OutputFormat, verbose: bool) -> Result<()> {
  let json = output.is_json();
  let start = Instant::now();
  let workspace = load_workspace(workspace)?;
  let ctx = workspace.build_context();
  let style = if json { DiagnosticStyle::Plain } else { DiagnosticStyle::detect() };
  let mut compiler = workspace
    .compiler(Arc::new(ConsoleLogger::new(verbose && !json)))
    .with_style(style);
  let backend = workspace.backend();

  info!(workspace = %workspace.root().display(), components = ctx.components.len(), "starting build");

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  rt.block_on(compiler.pre_build(&ctx)).context("Failed to write component configs")?;
  let result = compiler.build(&ctx, &backend).context("Build failed")?;

  if json {
    print_json(&result)?;
  } else {
    print_summary(&result, verbose, start.elapsed());
  }

  let total = result.total_errors();
  if total > 0 {
    bail!("{} error(s) found", total);
  }
  Ok(())
}

fn print_summary(result: &BuildTaskResult, verbose: bool, elapsed: Duration) {
  if result.components_results.is_empty() {
    print_info("All components are up to date");
  }

  for component in &result.components_results {
    let took = format_duration(Duration::from_millis(component.duration_ms()));
    if component.is_success() {
      println!("  {} {} ({})", symbols::SUCCESS, component.id, took);
    } else {
      println!(
        "  {} {} ({}, {} error(s))",
        symbols::ERROR,
        component.id,
        took,
        component.errors.len()
      );
    }
    if verbose {
      let started = UNIX_EPOCH + Duration::from_millis(component.start_time);
      println!("      started {}", humantime::format_rfc3339_millis(started));
    }
  }

  println!();
  if !result.has_errors() {
    print_success("Build complete!");
  }
  print_stat("Components built", &result.components_results.len().to_string());
  print_stat("Errors", &result.total_errors().to_string());
  print_stat("Duration", &format_duration(elapsed));
}
