use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Outcome of building one component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentBuildResult {
  pub id: String,
  /// Milliseconds since the Unix epoch.
  pub start_time: u64,
  /// Milliseconds since the Unix epoch; 0 while the build is still open.
  pub end_time: u64,
  /// Formatted diagnostics attributed to this component.
  pub errors: Vec<String>,
}

impl ComponentBuildResult {
  /// Start a result for `id`, stamped with the current time.
  pub fn open(id: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      start_time: now_millis(),
      end_time: 0,
      errors: Vec::new(),
    }
  }

  /// Stamp the end time.
  pub fn close(mut self) -> Self {
    self.end_time = now_millis().max(self.start_time);
    self
  }

  pub fn duration_ms(&self) -> u64 {
    self.end_time.saturating_sub(self.start_time)
  }

  pub fn is_success(&self) -> bool {
    self.errors.is_empty()
  }
}

fn now_millis() -> u64 {
  SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .map(|d| d.as_millis() as u64)
    .unwrap_or(0)
}
