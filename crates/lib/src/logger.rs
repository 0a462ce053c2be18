//! Logger collaborator consumed by the orchestration.
//!
//! The orchestration reports through this narrow surface rather than calling
//! `tracing` directly at its user-facing points, so a front end can render
//! failures and progress its own way. [`TracingLogger`] forwards everything
//! to `tracing`; [`MemoryLogger`] records messages for inspection.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use tracing::{debug, error, info};

/// Logger surface used by the orchestrator.
pub trait Logger: Send + Sync {
  fn info(&self, msg: &str);
  fn debug(&self, msg: &str);
  /// Report a failure the user should see, without aborting anything.
  fn console_failure(&self, msg: &str);
  /// Start a progress report over `total` items.
  fn create_long_process_logger(&self, label: &str, total: usize) -> Box<dyn LongProcessLogger>;
}

/// Progress handle returned by [`Logger::create_long_process_logger`].
pub trait LongProcessLogger {
  /// Report that the item named `label` is being processed.
  fn log_progress(&mut self, label: &str);
  fn end(self: Box<Self>);
}

/// A [`Logger`] that forwards to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
  fn info(&self, msg: &str) {
    info!("{}", msg);
  }

  fn debug(&self, msg: &str) {
    debug!("{}", msg);
  }

  fn console_failure(&self, msg: &str) {
    error!("{}", msg);
  }

  fn create_long_process_logger(&self, label: &str, total: usize) -> Box<dyn LongProcessLogger> {
    info!(process = %label, total, "started");
    Box::new(TracingProgress {
      label: label.to_string(),
      total,
      current: 0,
      started: Instant::now(),
    })
  }
}

struct TracingProgress {
  label: String,
  total: usize,
  current: usize,
  started: Instant,
}

impl LongProcessLogger for TracingProgress {
  fn log_progress(&mut self, label: &str) {
    self.current += 1;
    info!(
      process = %self.label,
      current = self.current,
      total = self.total,
      "{}",
      label
    );
  }

  fn end(self: Box<Self>) {
    info!(
      process = %self.label,
      processed = self.current,
      elapsed_ms = self.started.elapsed().as_millis() as u64,
      "completed"
    );
  }
}

/// A message captured by [`MemoryLogger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
  Info(String),
  Debug(String),
  Failure(String),
  ProcessStarted { label: String, total: usize },
  Progress(String),
  ProcessEnded { label: String },
}

/// A [`Logger`] that keeps every message in memory.
///
/// Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct MemoryLogger {
  entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl MemoryLogger {
  pub fn new() -> Self {
    Self::default()
  }

  /// Snapshot of everything logged so far.
  pub fn entries(&self) -> Vec<LogEntry> {
    self.lock().clone()
  }

  /// Messages passed to `console_failure`, in order.
  pub fn failures(&self) -> Vec<String> {
    self
      .lock()
      .iter()
      .filter_map(|e| match e {
        LogEntry::Failure(msg) => Some(msg.clone()),
        _ => None,
      })
      .collect()
  }

  /// Labels passed to `log_progress`, in order.
  pub fn progress(&self) -> Vec<String> {
    self
      .lock()
      .iter()
      .filter_map(|e| match e {
        LogEntry::Progress(label) => Some(label.clone()),
        _ => None,
      })
      .collect()
  }

  fn push(&self, entry: LogEntry) {
    self.lock().push(entry);
  }

  fn lock(&self) -> std::sync::MutexGuard<'_, Vec<LogEntry>> {
    // A panic while holding the lock leaves the buffer usable
    self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }
}

impl Logger for MemoryLogger {
  fn info(&self, msg: &str) {
    self.push(LogEntry::Info(msg.to_string()));
  }

  fn debug(&self, msg: &str) {
    self.push(LogEntry::Debug(msg.to_string()));
  }

  fn console_failure(&self, msg: &str) {
    self.push(LogEntry::Failure(msg.to_string()));
  }

  fn create_long_process_logger(&self, label: &str, total: usize) -> Box<dyn LongProcessLogger> {
    self.push(LogEntry::ProcessStarted {
      label: label.to_string(),
      total,
    });
    Box::new(MemoryProgress {
      logger: self.clone(),
      label: label.to_string(),
    })
  }
}

struct MemoryProgress {
  logger: MemoryLogger,
  label: String,
}

impl LongProcessLogger for MemoryProgress {
  fn log_progress(&mut self, label: &str) {
    self.logger.push(LogEntry::Progress(label.to_string()));
  }

  fn end(self: Box<Self>) {
    self.logger.push(LogEntry::ProcessEnded { label: self.label });
  }
}
