use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::logger::ConsoleLogger;
use crate::output::print_stat;

use super::load_workspace;

pub fn cmd_show_config(workspace: &Path) -> Result<()> {
  let workspace = load_workspace(workspace)?;
  let compiler = workspace.compiler(Arc::new(ConsoleLogger::new(false)));

  print_stat("Compiler", &format!("{} ({})", compiler.display_name(), compiler.id()));
  print_stat("Output directory", compiler.dist_dir());
  print_stat("Artifact", compiler.artifact_name());
  match compiler.version(&workspace.backend()) {
    Ok(version) => print_stat("Version", &version),
    Err(e) => {
      debug!(error = %e, "compiler version unavailable");
      print_stat("Version", "unavailable");
    }
  }
  println!("{}", compiler.display_config());
  Ok(())
}
