//! Parser for the compiler's non-pretty console output.
//!
//! Recognized lines:
//!
//! ```text
//! src/index.ts(3,7): error TS2322: Type 'string' is not assignable to type 'number'.
//! error TS5083: Cannot read file '/ws/tsconfig.json'.
//!   Additional detail for the previous diagnostic.
//! ```
//!
//! Relative file paths are resolved against the directory the compiler ran in.

use std::path::Path;

use super::{Diagnostic, DiagnosticCategory};
use crate::util::path::resolve;

/// Parse every diagnostic in `output`. Unrecognized lines are ignored.
pub fn parse_output(output: &str, cwd: &Path) -> Vec<Diagnostic> {
  let mut diagnostics: Vec<Diagnostic> = Vec::new();

  for line in output.lines() {
    if line.trim().is_empty() {
      continue;
    }

    if line.starts_with(char::is_whitespace) {
      if let Some(last) = diagnostics.last_mut() {
        last.message.push('\n');
        last.message.push_str(line.trim());
      }
      continue;
    }

    if let Some(diagnostic) = parse_general(line).or_else(|| parse_scoped(line, cwd)) {
      diagnostics.push(diagnostic);
    }
  }

  diagnostics
}

/// `error TS5083: message`
fn parse_general(line: &str) -> Option<Diagnostic> {
  let (category, code, message) = parse_tail(line)?;
  Some(Diagnostic::general(Some(code), message).with_category(category))
}

/// `file(line,col): error TS2322: message`
fn parse_scoped(line: &str, cwd: &Path) -> Option<Diagnostic> {
  let (head, tail) = line.split_once("): ")?;
  let open = head.rfind('(')?;
  let (file, coords) = (&head[..open], &head[open + 1..]);
  let (row, col) = coords.split_once(',')?;
  let row: u32 = row.trim().parse().ok()?;
  let col: u32 = col.trim().parse().ok()?;
  let (category, code, message) = parse_tail(tail)?;

  if file.is_empty() {
    return None;
  }

  Some(Diagnostic::scoped(resolve(cwd, file), row, col, Some(code), message).with_category(category))
}

/// `error TS2322: message` → (category, code, message)
fn parse_tail(s: &str) -> Option<(DiagnosticCategory, u32, &str)> {
  let (category, rest) = s.split_once(' ')?;
  let category = DiagnosticCategory::parse(category)?;
  let rest = rest.strip_prefix("TS")?;
  let (code, message) = rest.split_once(": ")?;
  let code: u32 = code.parse().ok()?;
  Some((category, code, message))
}
