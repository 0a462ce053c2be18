//! Backend that drives an external compiler executable.
//!
//! Opening a manifest discovers the project graph and orders it. Projects are
//! handed out lazily: when a project comes up, its fingerprint is compared to
//! the stamp stored by its last clean build, and it is skipped when nothing
//! changed and none of its references were handed out in this run.
//!
//! Stamps live next to the manifest:
//!
//! ```text
//! <cache_root>/
//! ├── tsconfig.json          # reference manifest
//! └── .fingerprints/
//!     └── <hash of config path>
//! ```

use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::consts::STAMP_NAME_LEN;
use crate::diagnostics::parse::parse_output;
use crate::diagnostics::{Diagnostic, DiagnosticCategory};
use crate::util::hash::{ContentHash, hash_bytes};

use super::project::{Project, discover};
use super::{BackendError, BuildUnit, CompilerBackend, InvalidatedGraph};

/// Directory holding fingerprint stamps, next to the manifest.
pub const FINGERPRINTS_DIR: &str = ".fingerprints";

/// How to invoke the compiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessSettings {
  /// Executable name or path.
  pub command: String,
  /// Arguments placed before `-p <config>`.
  pub args: Vec<String>,
  /// Directory the compiler runs in; relative diagnostic paths resolve against it.
  #[serde(skip)]
  pub working_dir: PathBuf,
}

impl Default for ProcessSettings {
  fn default() -> Self {
    Self {
      command: "tsc".to_string(),
      args: vec!["--pretty".to_string(), "false".to_string()],
      working_dir: PathBuf::from("."),
    }
  }
}

/// [`CompilerBackend`] backed by a compiler executable.
#[derive(Debug, Clone)]
pub struct ProcessBackend {
  settings: ProcessSettings,
}

impl ProcessBackend {
  pub fn new(settings: ProcessSettings) -> Self {
    Self { settings }
  }

  pub fn settings(&self) -> &ProcessSettings {
    &self.settings
  }
}

impl CompilerBackend for ProcessBackend {
  fn name(&self) -> &str {
    &self.settings.command
  }

  fn version(&self) -> Result<String, BackendError> {
    let output = Command::new(&self.settings.command)
      .arg("--version")
      .current_dir(&self.settings.working_dir)
      .output()
      .map_err(|source| BackendError::Spawn {
        command: self.settings.command.clone(),
        source,
      })?;

    if !output.status.success() {
      return Err(BackendError::Exit {
        command: self.settings.command.clone(),
        status: output.status.to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
      });
    }

    // "Version 5.4.5" -> "5.4.5"
    let stdout = String::from_utf8_lossy(&output.stdout);
    let line = stdout.lines().next().unwrap_or_default().trim();
    Ok(line.strip_prefix("Version ").unwrap_or(line).to_string())
  }

  fn open(&self, manifest_path: &Path) -> Result<Box<dyn InvalidatedGraph>, BackendError> {
    let projects = discover(manifest_path)?;
    let stamps_dir = manifest_path
      .parent()
      .unwrap_or(Path::new("."))
      .join(FINGERPRINTS_DIR);

    info!(
      manifest = %manifest_path.display(),
      projects = projects.len(),
      compiler = %self.settings.command,
      "opened project graph"
    );

    Ok(Box::new(ProcessGraph {
      settings: self.settings.clone(),
      stamps_dir,
      pending: projects.into(),
      handed_out: HashSet::new(),
    }))
  }
}

struct ProcessGraph {
  settings: ProcessSettings,
  stamps_dir: PathBuf,
  pending: VecDeque<Project>,
  /// Config paths already handed out, and so rebuilt, in this run.
  handed_out: HashSet<PathBuf>,
}

impl ProcessGraph {
  fn stamp_path(&self, config_path: &Path) -> PathBuf {
    let digest = hash_bytes(config_path.to_string_lossy().as_bytes());
    let name = digest.0.get(..STAMP_NAME_LEN).unwrap_or(&digest.0).to_string();
    self.stamps_dir.join(name)
  }

  fn is_up_to_date(&self, project: &Project, fingerprint: Option<&ContentHash>, stamp_path: &Path) -> bool {
    let Some(fingerprint) = fingerprint else {
      return false;
    };
    if project.references.iter().any(|r| self.handed_out.contains(r)) {
      return false;
    }
    match fs::read_to_string(stamp_path) {
      Ok(stored) => stored.trim() == fingerprint.0,
      Err(_) => false,
    }
  }
}

impl InvalidatedGraph for ProcessGraph {
  fn next_unit(&mut self) -> Option<Box<dyn BuildUnit>> {
    while let Some(project) = self.pending.pop_front() {
      let stamp_path = self.stamp_path(&project.config_path);
      let fingerprint = match project.fingerprint() {
        Ok(hash) => Some(hash),
        Err(e) => {
          warn!(config = %project.config_path.display(), error = %e, "unable to fingerprint project");
          None
        }
      };

      if self.is_up_to_date(&project, fingerprint.as_ref(), &stamp_path) {
        debug!(config = %project.config_path.display(), "project is up to date");
        continue;
      }

      self.handed_out.insert(project.config_path.clone());
      return Some(Box::new(ProcessUnit {
        settings: self.settings.clone(),
        config_path: project.config_path,
        stamp_path,
        fingerprint,
      }));
    }
    None
  }
}

struct ProcessUnit {
  settings: ProcessSettings,
  config_path: PathBuf,
  stamp_path: PathBuf,
  fingerprint: Option<ContentHash>,
}

impl ProcessUnit {
  fn store_stamp(&self) {
    let Some(fingerprint) = &self.fingerprint else {
      return;
    };
    let result = fs::create_dir_all(self.stamp_path.parent().unwrap_or(Path::new(".")))
      .and_then(|_| fs::write(&self.stamp_path, &fingerprint.0));
    if let Err(e) = result {
      warn!(stamp = %self.stamp_path.display(), error = %e, "failed to store fingerprint");
    }
  }
}

impl BuildUnit for ProcessUnit {
  fn config_path(&self) -> &Path {
    &self.config_path
  }

  fn complete(self: Box<Self>) -> Vec<Diagnostic> {
    debug!(
      command = %self.settings.command,
      config = %self.config_path.display(),
      "running compiler"
    );

    let output = Command::new(&self.settings.command)
      .args(&self.settings.args)
      .arg("-p")
      .arg(&self.config_path)
      .current_dir(&self.settings.working_dir)
      .output();

    let output = match output {
      Ok(output) => output,
      Err(e) => {
        return vec![Diagnostic::general(
          None,
          format!("failed to run {}: {}", self.settings.command, e),
        )];
      }
    };

    let mut text = String::from_utf8_lossy(&output.stdout).to_string();
    if !text.is_empty() && !text.ends_with('\n') {
      text.push('\n');
    }
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    let mut diagnostics = parse_output(&text, &self.settings.working_dir);

    if !output.status.success() && diagnostics.is_empty() {
      let detail = text.trim();
      let message = if detail.is_empty() {
        format!("{} exited with {}", self.settings.command, output.status)
      } else {
        format!("{} exited with {}: {}", self.settings.command, output.status, detail)
      };
      diagnostics.push(Diagnostic::general(None, message));
    }

    let has_errors = diagnostics.iter().any(|d| d.category == DiagnosticCategory::Error);
    if output.status.success() && !has_errors {
      self.store_stamp();
    }

    diagnostics
  }
}
