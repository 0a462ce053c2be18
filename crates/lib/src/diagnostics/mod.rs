//! Compiler diagnostics: formatting, classification and routing.
//!
//! A diagnostic with a file location is *scoped*: it belongs to the component
//! currently being built and is appended to that component's result. One
//! without a location is *general*: nothing can attribute it to a single
//! component, so it aborts the run.

pub mod parse;
mod types;

use std::io::IsTerminal;

use owo_colors::OwoColorize;

use crate::error::{BuildError, BuildResult};
use crate::scheduler::ComponentBuildResult;

pub use types::*;

/// Output flavor for formatted diagnostics. Purely cosmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagnosticStyle {
  /// Colored, `file:line:col - error TSnnnn: message`.
  Pretty,
  /// `file(line,col): error TSnnnn: message`.
  #[default]
  Plain,
}

impl DiagnosticStyle {
  /// Pretty when stdout is a terminal.
  pub fn detect() -> Self {
    if std::io::stdout().is_terminal() {
      Self::Pretty
    } else {
      Self::Plain
    }
  }
}

/// Render a diagnostic as a single string.
pub fn format_diagnostic(diagnostic: &Diagnostic, style: DiagnosticStyle) -> String {
  let code = diagnostic.code.map(|c| format!(" TS{}", c)).unwrap_or_default();
  let category = diagnostic.category.as_str();

  match (style, &diagnostic.location) {
    (DiagnosticStyle::Plain, Some(loc)) => format!(
      "{}({},{}): {}{}: {}",
      loc.file.display(),
      loc.line,
      loc.column,
      category,
      code,
      diagnostic.message
    ),
    (DiagnosticStyle::Plain, None) => format!("{}{}: {}", category, code, diagnostic.message),
    (DiagnosticStyle::Pretty, location) => {
      let category = match diagnostic.category {
        DiagnosticCategory::Error => category.red().to_string(),
        DiagnosticCategory::Warning => category.yellow().to_string(),
        DiagnosticCategory::Suggestion | DiagnosticCategory::Message => category.blue().to_string(),
      };
      let head = format!("{}{}:", category, code.dimmed());
      match location {
        Some(loc) => format!(
          "{}:{}:{} - {} {}",
          loc.file.display().cyan(),
          loc.line.yellow(),
          loc.column.yellow(),
          head,
          diagnostic.message
        ),
        None => format!("{} {}", head, diagnostic.message),
      }
    }
  }
}

/// Route one diagnostic.
///
/// - General: returned as [`BuildError::General`].
/// - Scoped: appended to `open`, and the formatted text returned.
/// - Scoped with nothing open: [`BuildError::NoOpenResult`].
pub fn route(
  diagnostic: &Diagnostic,
  open: Option<&mut ComponentBuildResult>,
  style: DiagnosticStyle,
) -> BuildResult<String> {
  let formatted = format_diagnostic(diagnostic, style);

  let Some(location) = &diagnostic.location else {
    return Err(BuildError::General { message: formatted });
  };

  match open {
    Some(result) => {
      result.errors.push(formatted.clone());
      Ok(formatted)
    }
    None => Err(BuildError::NoOpenResult {
      file: location.file.clone(),
    }),
  }
}
