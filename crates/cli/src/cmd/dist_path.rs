use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use crate::logger::ConsoleLogger;

use super::load_workspace;

pub fn cmd_dist_path(workspace: &Path, sources: &[PathBuf]) -> Result<()> {
  let workspace = load_workspace(workspace)?;
  let compiler = workspace.compiler(Arc::new(ConsoleLogger::new(false)));

  for source in sources {
    println!("{}", compiler.dist_path_by_src_path(source).display());
  }
  Ok(())
}
