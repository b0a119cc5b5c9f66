//! Injectable logging for pipeline runs.

use std::fmt;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use weft_core::{BehaviorName, Phase, PipelineError};

/// Severity of a [`PipelineEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    /// Per-step timing.
    Debug,
    /// Phase and step starts.
    Info,
    /// Slow steps.
    Warn,
    /// Any failure.
    Error,
}

/// Something the executor reports while running a pipeline.
///
/// Fields are the structured parameters of the event.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub enum PipelineEvent<'a> {
    /// Import raised an error, or returned an unsuccessful or unnamed context.
    ImportFailed {
        /// Best-effort label of the raw input.
        input: &'a str,
        /// The captured error, when import raised one.
        error: Option<&'a PipelineError>,
    },
    /// The behavior list was empty.
    NoBehaviors {
        /// Name of the imported input.
        input: &'a str,
    },
    /// The setup hook is about to run.
    SetupStarted {
        /// Name of the imported input.
        input: &'a str,
    },
    /// The setup hook failed; no behavior will run.
    SetupFailed {
        /// Name of the imported input.
        input: &'a str,
        /// The captured error.
        error: &'a PipelineError,
    },
    /// The behavior loop is about to start.
    RunStarted {
        /// Name of the imported input.
        input: &'a str,
        /// Number of behaviors that will run.
        behaviors: usize,
    },
    /// A behavior is about to run.
    BehaviorStarted {
        /// The behavior.
        behavior: &'a BehaviorName,
        /// Name of the imported input.
        input: &'a str,
    },
    /// A behavior returned an error.
    BehaviorFailed {
        /// The behavior.
        behavior: &'a BehaviorName,
        /// Name of the imported input.
        input: &'a str,
        /// The captured error.
        error: &'a PipelineError,
    },
    /// A behavior finished, successfully or not.
    BehaviorCompleted {
        /// The behavior.
        behavior: &'a BehaviorName,
        /// Wall-clock time spent in the behavior.
        elapsed: Duration,
    },
    /// A behavior took longer than the slow-step threshold.
    BehaviorSlow {
        /// The behavior.
        behavior: &'a BehaviorName,
        /// Wall-clock time spent in the behavior.
        elapsed: Duration,
        /// The threshold it exceeded.
        threshold: Duration,
    },
    /// The cleanup hook is about to run.
    CleanupStarted {
        /// Name of the imported input.
        input: &'a str,
    },
    /// The cleanup hook failed.
    CleanupFailed {
        /// Name of the imported input.
        input: &'a str,
        /// The captured error.
        error: &'a PipelineError,
    },
}

impl PipelineEvent<'_> {
    /// Returns the level the event is logged at.
    pub fn level(&self) -> LogLevel {
        match self {
            PipelineEvent::BehaviorCompleted { .. } => LogLevel::Debug,
            PipelineEvent::SetupStarted { .. }
            | PipelineEvent::RunStarted { .. }
            | PipelineEvent::BehaviorStarted { .. }
            | PipelineEvent::CleanupStarted { .. } => LogLevel::Info,
            PipelineEvent::BehaviorSlow { .. } => LogLevel::Warn,
            PipelineEvent::ImportFailed { .. }
            | PipelineEvent::NoBehaviors { .. }
            | PipelineEvent::SetupFailed { .. }
            | PipelineEvent::BehaviorFailed { .. }
            | PipelineEvent::CleanupFailed { .. } => LogLevel::Error,
        }
    }

    /// Returns the lifecycle phase the event belongs to, or `None` for
    /// behavior-loop events.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            PipelineEvent::ImportFailed { .. } => Some(Phase::Import),
            PipelineEvent::SetupStarted { .. } | PipelineEvent::SetupFailed { .. } => {
                Some(Phase::Setup)
            }
            PipelineEvent::CleanupStarted { .. } | PipelineEvent::CleanupFailed { .. } => {
                Some(Phase::Cleanup)
            }
            _ => None,
        }
    }
}

impl fmt::Display for PipelineEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineEvent::ImportFailed { input, error } => match error {
                Some(error) => write!(f, "Failed to import input {input}: {}", error.cause()),
                None => write!(f, "Failed to import input {input}"),
            },
            PipelineEvent::NoBehaviors { input } => {
                write!(f, "There were no behaviors to apply to {input}")
            }
            PipelineEvent::SetupStarted { input } => write!(f, "Running setup for {input}"),
            PipelineEvent::SetupFailed { error, .. }
            | PipelineEvent::BehaviorFailed { error, .. }
            | PipelineEvent::CleanupFailed { error, .. } => write!(f, "{error}"),
            PipelineEvent::RunStarted { input, behaviors } => {
                write!(f, "Running pipeline for {input} ({behaviors} behaviors)")
            }
            PipelineEvent::BehaviorStarted { behavior, input } => {
                write!(f, "Applying {behavior} to {input}")
            }
            PipelineEvent::BehaviorCompleted { behavior, elapsed } => {
                write!(f, "Pipeline behavior {behavior} completed in {elapsed:?}")
            }
            PipelineEvent::BehaviorSlow { behavior, .. } => write!(
                f,
                "Pipeline behavior {behavior} took longer than expected to complete"
            ),
            PipelineEvent::CleanupStarted { input } => write!(f, "Running cleanup for {input}"),
        }
    }
}

/// Receives the executor's events.
///
/// The executor's behavior never depends on the logger; [`NoopLogger`] is a
/// valid choice.
pub trait PipelineLogger: Send + Sync {
    /// Handles one event.
    fn log(&self, event: &PipelineEvent<'_>);
}

/// Forwards events to `tracing` with structured fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl PipelineLogger for TracingLogger {
    fn log(&self, event: &PipelineEvent<'_>) {
        match *event {
            PipelineEvent::ImportFailed { input, error: err } => match err {
                Some(err) => error!(
                    task = "Import",
                    input,
                    reason = %err.cause(),
                    "Failed to import input"
                ),
                None => error!(task = "Import", input, "Failed to import input"),
            },
            PipelineEvent::NoBehaviors { input } => error!(
                task = "Pre-startup",
                input,
                "There were no behaviors to apply"
            ),
            PipelineEvent::SetupStarted { input } => info!(task = "Setup", input, "Running setup"),
            PipelineEvent::SetupFailed { input, error: err } => error!(
                task = "Setup",
                input,
                reason = %err.cause(),
                "Failed to complete task"
            ),
            PipelineEvent::RunStarted { input, behaviors } => {
                info!(input, behaviors, "Running pipeline")
            }
            PipelineEvent::BehaviorStarted { behavior, input } => {
                info!(behavior = %behavior, input, "Applying behavior")
            }
            PipelineEvent::BehaviorFailed {
                behavior,
                input,
                error: err,
            } => error!(
                behavior = %behavior,
                input,
                reason = %err.cause(),
                "Failed to apply behavior"
            ),
            PipelineEvent::BehaviorCompleted { behavior, elapsed } => debug!(
                behavior = %behavior,
                elapsed = ?elapsed,
                "Pipeline behavior completed"
            ),
            PipelineEvent::BehaviorSlow {
                behavior,
                elapsed,
                threshold,
            } => warn!(
                behavior = %behavior,
                elapsed = ?elapsed,
                threshold = ?threshold,
                "Pipeline behavior took longer than expected to complete"
            ),
            PipelineEvent::CleanupStarted { input } => {
                info!(task = "Cleanup", input, "Running cleanup")
            }
            PipelineEvent::CleanupFailed { input, error: err } => error!(
                task = "Cleanup",
                input,
                reason = %err.cause(),
                "Failed to complete task"
            ),
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl PipelineLogger for NoopLogger {
    fn log(&self, _event: &PipelineEvent<'_>) {}
}
