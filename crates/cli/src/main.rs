mod cmd;
mod logger;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use crate::output::{OutputFormat, print_error};

/// compbuild - incremental, component-scoped TypeScript builds
#[derive(Parser)]
#[command(name = "compbuild")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Workspace root (default: current directory)
  #[arg(short, long, global = true, default_value = ".")]
  workspace: PathBuf,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build every out-of-date component
  Build {
    /// Result format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },
  /// Write component configs and the reference manifest without building
  Configs,
  /// Print the output path of each source path
  DistPath {
    /// Source paths, relative to a component root
    #[arg(required = true)]
    sources: Vec<PathBuf>,
  },
  /// Print the base config template
  ShowConfig,
}

fn main() {
  let cli = Cli::parse();

  let default_level = if cli.verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
  let filter = EnvFilter::builder()
    .with_default_directive(default_level.into())
    .from_env_lossy();
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  if let Err(e) = run(cli) {
    print_error(&format!("{:#}", e));
    std::process::exit(1);
  }
}

fn run(cli: Cli) -> Result<()> {
  match cli.command {
    Commands::Build { output } => cmd::cmd_build(&cli.workspace, output, cli.verbose),
    Commands::Configs => cmd::cmd_configs(&cli.workspace),
    Commands::DistPath { sources } => cmd::cmd_dist_path(&cli.workspace, &sources),
    Commands::ShowConfig => cmd::cmd_show_config(&cli.workspace),
  }
}
