//! A replayable graph for exercising the scheduler without a compiler.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::diagnostics::Diagnostic;

use super::{BackendError, BuildUnit, CompilerBackend, InvalidatedGraph};

/// A unit that returns fixed diagnostics.
#[derive(Debug, Clone)]
pub struct ScriptedUnit {
  pub config_path: PathBuf,
  pub diagnostics: Vec<Diagnostic>,
}

impl ScriptedUnit {
  pub fn new(config_path: impl Into<PathBuf>) -> Self {
    Self {
      config_path: config_path.into(),
      diagnostics: Vec::new(),
    }
  }

  pub fn with_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
    self.diagnostics.push(diagnostic);
    self
  }
}

impl BuildUnit for ScriptedUnit {
  fn config_path(&self) -> &Path {
    &self.config_path
  }

  fn complete(self: Box<Self>) -> Vec<Diagnostic> {
    self.diagnostics
  }
}

/// Hands out a fixed sequence of units, in order.
#[derive(Debug, Clone, Default)]
pub struct ScriptedGraph {
  units: VecDeque<ScriptedUnit>,
}

impl ScriptedGraph {
  pub fn new(units: impl IntoIterator<Item = ScriptedUnit>) -> Self {
    Self {
      units: units.into_iter().collect(),
    }
  }
}

impl InvalidatedGraph for ScriptedGraph {
  fn next_unit(&mut self) -> Option<Box<dyn BuildUnit>> {
    self.units.pop_front().map(|unit| Box::new(unit) as Box<dyn BuildUnit>)
  }
}

/// A backend whose graph is a [`ScriptedGraph`], recording the manifests it opened.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
  graph: ScriptedGraph,
  opened: Arc<Mutex<Vec<PathBuf>>>,
}

impl ScriptedBackend {
  pub fn new(graph: ScriptedGraph) -> Self {
    Self {
      graph,
      opened: Arc::default(),
    }
  }

  /// Manifest paths passed to [`CompilerBackend::open`], in call order.
  pub fn opened(&self) -> Vec<PathBuf> {
    self.opened.lock().map(|o| o.clone()).unwrap_or_default()
  }
}

impl CompilerBackend for ScriptedBackend {
  fn name(&self) -> &str {
    "scripted"
  }

  fn version(&self) -> Result<String, BackendError> {
    Ok("0.0.0".to_string())
  }

  fn open(&self, manifest_path: &Path) -> Result<Box<dyn InvalidatedGraph>, BackendError> {
    if let Ok(mut opened) = self.opened.lock() {
      opened.push(manifest_path.to_path_buf());
    }
    Ok(Box::new(self.graph.clone()))
  }
}
