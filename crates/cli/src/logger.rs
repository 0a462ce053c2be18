//! Terminal rendering of orchestration output.

use tracing::debug;

use compbuild_lib::logger::{Logger, LongProcessLogger, TracingLogger};

use crate::output::print_progress;

/// Prints compiler diagnostics to stderr as they arrive.
///
/// Informational messages go to `tracing`. Progress lines are only shown
/// when `show_progress` is set.
pub struct ConsoleLogger {
  tracing: TracingLogger,
  show_progress: bool,
}

impl ConsoleLogger {
  pub fn new(show_progress: bool) -> Self {
    Self {
      tracing: TracingLogger,
      show_progress,
    }
  }
}

impl Logger for ConsoleLogger {
  fn info(&self, msg: &str) {
    self.tracing.info(msg);
  }

  fn debug(&self, msg: &str) {
    self.tracing.debug(msg);
  }

  fn console_failure(&self, msg: &str) {
    eprintln!("{}", msg);
  }

  fn create_long_process_logger(&self, label: &str, total: usize) -> Box<dyn LongProcessLogger> {
    debug!(process = %label, total, "started");
    Box::new(ConsoleProgress {
      label: label.to_string(),
      show: self.show_progress,
      current: 0,
      total,
    })
  }
}

struct ConsoleProgress {
  label: String,
  show: bool,
  current: usize,
  total: usize,
}

impl LongProcessLogger for ConsoleProgress {
  fn log_progress(&mut self, label: &str) {
    self.current += 1;
    if self.show {
      print_progress(self.current, self.total, label);
    }
  }

  fn end(self: Box<Self>) {
    debug!(process = %self.label, processed = self.current, "completed");
  }
}
