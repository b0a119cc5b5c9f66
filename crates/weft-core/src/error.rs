//! Pipeline error types.

use crate::behavior::BehaviorName;
use std::fmt;
use thiserror::Error;

/// Boxed error accepted from any capability implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A lifecycle phase of a pipeline run that is not a behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Turning the raw input into a context.
    Import,
    /// The optional setup hook, run before any behavior.
    Setup,
    /// The optional cleanup hook, run after every behavior.
    Cleanup,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Import => write!(f, "Import"),
            Phase::Setup => write!(f, "Setup"),
            Phase::Cleanup => write!(f, "Cleanup"),
        }
    }
}

/// Failure raised by a capability: an adapter hook or a behavior.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CapabilityError {
    /// A plain failure description.
    #[error("{0}")]
    Message(String),

    /// The run's cancellation token was triggered.
    #[error("operation was cancelled")]
    Cancelled,

    /// The adapter does not understand the input it was handed.
    #[error("input format is not accepted: {0}")]
    UnsupportedInput(String),

    /// An I/O failure while reading or writing the payload.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Any other error type.
    #[error(transparent)]
    Other(#[from] BoxError),
}

impl CapabilityError {
    /// Creates a [`CapabilityError::Message`].
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

/// A failure captured on a context, attributed to the part of the run that
/// raised it.
///
/// Phase-level failures ([`PipelineError::Import`], [`PipelineError::Phase`])
/// name the task that failed; step-level failures
/// ([`PipelineError::Behavior`]) name the behavior.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PipelineError {
    /// The import capability raised an error.
    #[error("Failed to import input {input}: {source}")]
    Import {
        /// Best-effort label of the input.
        input: String,
        /// The underlying failure.
        #[source]
        source: CapabilityError,
    },

    /// Setup or cleanup raised an error.
    #[error("Failed to complete task {phase} for {input}: {source}")]
    Phase {
        /// Which lifecycle hook failed.
        phase: Phase,
        /// Name of the imported input.
        input: String,
        /// The underlying failure.
        #[source]
        source: CapabilityError,
    },

    /// A behavior raised an error.
    #[error("Failed to apply {behavior} to {input}: {source}")]
    Behavior {
        /// The failing behavior.
        behavior: BehaviorName,
        /// Name of the imported input.
        input: String,
        /// The underlying failure.
        #[source]
        source: CapabilityError,
    },
}

impl PipelineError {
    /// Returns the capability failure this error wraps.
    pub fn cause(&self) -> &CapabilityError {
        match self {
            PipelineError::Import { source, .. }
            | PipelineError::Phase { source, .. }
            | PipelineError::Behavior { source, .. } => source,
        }
    }

    /// Returns the lifecycle phase for phase-level failures.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            PipelineError::Import { .. } => Some(Phase::Import),
            PipelineError::Phase { phase, .. } => Some(*phase),
            PipelineError::Behavior { .. } => None,
        }
    }

    /// Returns the failing behavior for step-level failures.
    pub fn behavior(&self) -> Option<&BehaviorName> {
        match self {
            PipelineError::Behavior { behavior, .. } => Some(behavior),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let error = PipelineError::Behavior {
            behavior: BehaviorName::new("Normalize"),
            input: "members.edi".to_string(),
            source: CapabilityError::msg("bad segment"),
        };
        assert_eq!(
            error.to_string(),
            "Failed to apply Normalize to members.edi: bad segment"
        );

        let error = PipelineError::Phase {
            phase: Phase::Cleanup,
            input: "members.edi".to_string(),
            source: CapabilityError::Cancelled,
        };
        assert_eq!(
            error.to_string(),
            "Failed to complete task Cleanup for members.edi: operation was cancelled"
        );

        let error = PipelineError::Import {
            input: "members.edi".to_string(),
            source: CapabilityError::UnsupportedInput("xml".to_string()),
        };
        assert_eq!(
            error.to_string(),
            "Failed to import input members.edi: input format is not accepted: xml"
        );
    }

    #[test]
    fn test_attribution() {
        let step = PipelineError::Behavior {
            behavior: BehaviorName::new("Validate"),
            input: "a".to_string(),
            source: CapabilityError::msg("x"),
        };
        assert_eq!(step.phase(), None);
        assert_eq!(step.behavior().map(|b| b.as_str()), Some("Validate"));

        let setup = PipelineError::Phase {
            phase: Phase::Setup,
            input: "a".to_string(),
            source: CapabilityError::msg("x"),
        };
        assert_eq!(setup.phase(), Some(Phase::Setup));
        assert!(setup.behavior().is_none());
    }

    #[test]
    fn test_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing file");
        let error = PipelineError::Import {
            input: "a.edi".to_string(),
            source: CapabilityError::from(io),
        };
        assert!(matches!(error.cause(), CapabilityError::Io(_)));
        assert_eq!(
            error.source().map(|s| s.to_string()),
            Some("missing file".to_string())
        );
    }

    #[test]
    fn test_boxed_error_conversion() {
        let boxed: BoxError = "parse failure".into();
        let error = CapabilityError::from(boxed);
        assert_eq!(error.to_string(), "parse failure");
    }
}
