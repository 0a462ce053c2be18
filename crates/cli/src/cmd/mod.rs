mod build;
mod configs;
mod dist_path;
mod show_config;

pub use build::cmd_build;
pub use configs::cmd_configs;
pub use dist_path::cmd_dist_path;
pub use show_config::cmd_show_config;

use std::path::Path;

use anyhow::{Context, Result};

use compbuild_lib::workspace::Workspace;

fn load_workspace(path: &Path) -> Result<Workspace> {
  Workspace::load(path).with_context(|| format!("Failed to load workspace at {}", path.display()))
}
