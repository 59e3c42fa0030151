//! # Task-scoped loggers.
//!
//! Every task invocation receives a fresh [`TaskLogger`] built by a [`LogSink`]
//! with a numbered prefix such as `"[seqvisor] task 2:"`. The default sink,
//! [`TracingSink`], routes lines through `tracing` under a `task` span and, when
//! console output is requested, mirrors them to stderr.
//!
//! ```rust
//! use seqvisor::{LogSink, TracingSink};
//!
//! let log = TracingSink.setup("[seqvisor] task 1:", false).unwrap();
//! assert_eq!(log.prefix(), "[seqvisor] task 1:");
//! log.info("mounting state partition");
//! ```

use std::fmt;
use std::sync::Arc;

use crate::error::LoggerError;

/// Produces scoped loggers for task invocations.
pub trait LogSink: Send + Sync + 'static {
    /// Builds a logger whose lines are prefixed with `prefix`.
    ///
    /// `console` asks the sink to also write to the console.
    fn setup(&self, prefix: &str, console: bool) -> Result<TaskLogger, LoggerError>;
}

/// Logger handed to a single task invocation.
#[derive(Clone)]
pub struct TaskLogger {
    prefix: Arc<str>,
    console: bool,
    span: tracing::Span,
}

impl TaskLogger {
    /// Creates a logger that emits inside `span`.
    pub fn new(prefix: impl Into<Arc<str>>, console: bool, span: tracing::Span) -> Self {
        Self {
            prefix: prefix.into(),
            console,
            span,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn console(&self) -> bool {
        self.console
    }

    /// The span all lines of this logger are emitted under.
    pub fn span(&self) -> &tracing::Span {
        &self.span
    }

    pub fn debug(&self, msg: impl fmt::Display) {
        tracing::debug!(parent: &self.span, "{} {}", self.prefix, msg);
    }

    pub fn info(&self, msg: impl fmt::Display) {
        tracing::info!(parent: &self.span, "{} {}", self.prefix, msg);
        self.mirror(&msg);
    }

    pub fn warn(&self, msg: impl fmt::Display) {
        tracing::warn!(parent: &self.span, "{} {}", self.prefix, msg);
        self.mirror(&msg);
    }

    pub fn error(&self, msg: impl fmt::Display) {
        tracing::error!(parent: &self.span, "{} {}", self.prefix, msg);
        self.mirror(&msg);
    }

    fn mirror(&self, msg: &dyn fmt::Display) {
        if self.console {
            eprintln!("{} {}", self.prefix, msg);
        }
    }
}

impl fmt::Debug for TaskLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskLogger")
            .field("prefix", &self.prefix)
            .field("console", &self.console)
            .finish()
    }
}

/// Default sink backed by `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn setup(&self, prefix: &str, console: bool) -> Result<TaskLogger, LoggerError> {
        let span = tracing::info_span!("task", prefix = %prefix);
        Ok(TaskLogger::new(prefix, console, span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracing_sink_keeps_prefix_and_console_flag() {
        let log = TracingSink.setup("[test] task 7:", true).unwrap();
        assert_eq!(log.prefix(), "[test] task 7:");
        assert!(log.console());

        let quiet = TracingSink.setup("[test] task 8:", false).unwrap();
        assert!(!quiet.console());
        quiet.debug("no subscriber installed, nothing to observe");
    }
}
