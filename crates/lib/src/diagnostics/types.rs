use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Severity reported by the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
  Error,
  Warning,
  Suggestion,
  Message,
}

impl DiagnosticCategory {
  pub fn as_str(&self) -> &'static str {
    match self {
      DiagnosticCategory::Error => "error",
      DiagnosticCategory::Warning => "warning",
      DiagnosticCategory::Suggestion => "suggestion",
      DiagnosticCategory::Message => "message",
    }
  }

  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "error" => Some(DiagnosticCategory::Error),
      "warning" => Some(DiagnosticCategory::Warning),
      "suggestion" => Some(DiagnosticCategory::Suggestion),
      "message" => Some(DiagnosticCategory::Message),
      _ => None,
    }
  }
}

/// Position of a scoped diagnostic. Lines and columns are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticLocation {
  pub file: PathBuf,
  pub line: u32,
  pub column: u32,
}

/// A compiler diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
  pub category: DiagnosticCategory,
  /// Numeric code, rendered as `TSnnnn`.
  pub code: Option<u32>,
  pub message: String,
  /// `None` for general diagnostics.
  pub location: Option<DiagnosticLocation>,
}

impl Diagnostic {
  /// An error not attributable to any file.
  pub fn general(code: Option<u32>, message: impl Into<String>) -> Self {
    Self {
      category: DiagnosticCategory::Error,
      code,
      message: message.into(),
      location: None,
    }
  }

  /// An error in `file`.
  pub fn scoped(file: impl Into<PathBuf>, line: u32, column: u32, code: Option<u32>, message: impl Into<String>) -> Self {
    Self {
      category: DiagnosticCategory::Error,
      code,
      message: message.into(),
      location: Some(DiagnosticLocation {
        file: file.into(),
        line,
        column,
      }),
    }
  }

  pub fn with_category(mut self, category: DiagnosticCategory) -> Self {
    self.category = category;
    self
  }

  pub fn is_general(&self) -> bool {
    self.location.is_none()
  }
}
