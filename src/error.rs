//! Error types used by the controller, the event listener and tasks.
//!
//! - [`ControllerError`] - why a [`Controller::run`](crate::Controller::run) or
//!   [`Controller::listen_for_events`](crate::Controller::listen_for_events) call failed.
//! - [`PhaseError`] - the single representative task failure of a phase.
//! - [`TaskError`] - failure of one task execution.
//! - [`ListenerError`] - failure of an event source.
//! - [`BuildError`] - controller construction failures.
//!
//! Classification enums provide `as_label` for logs/metrics.

use std::{io, num::ParseIntError, path::PathBuf};

use thiserror::Error;

use crate::sequence::Sequence;

/// Boxed error used at collaborator boundaries.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// # Errors returned by the controller.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ControllerError {
    /// The controller has no runtime attached.
    #[error("runtime is undefined")]
    UndefinedRuntime,

    /// Another sequence is in flight.
    #[error("locked")]
    Locked,

    /// The payload does not match what the sequence requires.
    #[error("invalid sequence data for {sequence} sequence: expected {expected}, got {got}")]
    InvalidSequenceData {
        sequence: Sequence,
        expected: &'static str,
        got: &'static str,
    },

    /// A phase failed; remaining phases were not started.
    #[error("error running phase {phase}/{phases} in {sequence} sequence: {source}")]
    Phase {
        sequence: Sequence,
        /// 1-based phase index.
        phase: usize,
        /// Number of phases in the sequence.
        phases: usize,
        #[source]
        source: PhaseError,
    },

    /// An event source failed.
    #[error("event listener failed: {0}")]
    Listener(#[from] ListenerError),
}

impl ControllerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use seqvisor::ControllerError;
    ///
    /// assert_eq!(ControllerError::Locked.as_label(), "locked");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ControllerError::UndefinedRuntime => "undefined_runtime",
            ControllerError::Locked => "locked",
            ControllerError::InvalidSequenceData { .. } => "invalid_sequence_data",
            ControllerError::Phase { .. } => "phase_failed",
            ControllerError::Listener(_) => "listener_failed",
        }
    }

    /// Whether retrying the same call later may succeed.
    ///
    /// Only [`ControllerError::Locked`] is transient.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ControllerError::Locked)
    }
}

/// Task failure surfaced from a phase, with its position.
#[derive(Error, Debug)]
#[error("task {task}/{tasks}: failed, {source}")]
pub struct PhaseError {
    /// 1-based task position within the phase.
    pub task: usize,
    /// Number of tasks in the phase.
    pub tasks: usize,
    #[source]
    pub source: TaskError,
}

/// # Errors produced by task execution.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TaskError {
    /// Task reported a failure.
    #[error("{error}")]
    Fail { error: String },

    /// Scoped logger could not be set up; the task was never built.
    #[error("logger setup failed: {0}")]
    Logger(#[from] LoggerError),

    /// Task unit panicked.
    #[error("task panicked: {error}")]
    Panicked { error: String },
}

impl TaskError {
    /// Convenience constructor for [`TaskError::Fail`].
    pub fn fail(error: impl ToString) -> Self {
        TaskError::Fail {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use seqvisor::TaskError;
    ///
    /// assert_eq!(TaskError::fail("disk busy").as_label(), "task_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::Logger(_) => "task_logger",
            TaskError::Panicked { .. } => "task_panicked",
        }
    }
}

/// Failure of the task logger sink.
#[derive(Error, Debug)]
#[error("{prefix:?}: {reason}")]
pub struct LoggerError {
    pub prefix: String,
    pub reason: String,
}

/// # Errors produced by event sources.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ListenerError {
    /// Registering for the termination signal failed.
    #[error("signal registration: {0}")]
    Signal(#[source] io::Error),

    /// The power event source failed.
    #[error("power event source: {0}")]
    Power(String),
}

impl ListenerError {
    pub fn as_label(&self) -> &'static str {
        match self {
            ListenerError::Signal(_) => "listener_signal",
            ListenerError::Power(_) => "listener_power",
        }
    }
}

/// # Errors raised while constructing a controller or its runtime.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum BuildError {
    /// The USB delay probe exists but could not be read.
    #[error("reading {path:?}: {source}")]
    UsbDelay {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The USB delay probe does not hold a whole number of seconds.
    #[error("invalid usb delay {value:?}: {source}")]
    UsbDelayValue {
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// The machine configuration could not be parsed.
    #[error("failed to parse config: {0}")]
    Config(#[source] BoxError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_error_message_carries_positions() {
        let err = ControllerError::Phase {
            sequence: Sequence::Shutdown,
            phase: 2,
            phases: 2,
            source: PhaseError {
                task: 1,
                tasks: 1,
                source: TaskError::fail("disk busy"),
            },
        };

        assert_eq!(
            err.to_string(),
            "error running phase 2/2 in shutdown sequence: task 1/1: failed, disk busy"
        );
        assert_eq!(err.as_label(), "phase_failed");
        assert!(!err.is_retryable());
    }

    #[test]
    fn only_locked_is_retryable() {
        assert!(ControllerError::Locked.is_retryable());
        assert!(!ControllerError::UndefinedRuntime.is_retryable());
        assert!(
            !ControllerError::InvalidSequenceData {
                sequence: Sequence::Reset,
                expected: "reset",
                got: "none",
            }
            .is_retryable()
        );
    }

    #[test]
    fn phase_error_exposes_task_error_as_source() {
        use std::error::Error as _;

        let err = PhaseError {
            task: 3,
            tasks: 4,
            source: TaskError::Panicked {
                error: "boom".into(),
            },
        };
        let source = err.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("task panicked: boom"));
    }
}
