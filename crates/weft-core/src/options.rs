//! Run options and the source the executor reads them from.

use serde::{Deserialize, Serialize};

/// Controls the optional lifecycle phases of a run.
///
/// Both phases are off by default. Deserializes from any serde format; missing
/// fields fall back to their defaults.
///
/// # Examples
///
/// ```
/// use weft_core::PipelineOptions;
///
/// let options = PipelineOptions::default().with_cleanup(true);
/// assert!(!options.setup_enabled);
/// assert!(options.cleanup_enabled);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Run the adapter's setup hook before the first behavior.
    pub setup_enabled: bool,
    /// Run the adapter's cleanup hook after the last behavior.
    pub cleanup_enabled: bool,
}

impl PipelineOptions {
    /// Returns a copy with setup enabled or disabled.
    pub fn with_setup(mut self, enabled: bool) -> Self {
        self.setup_enabled = enabled;
        self
    }

    /// Returns a copy with cleanup enabled or disabled.
    pub fn with_cleanup(mut self, enabled: bool) -> Self {
        self.cleanup_enabled = enabled;
        self
    }
}

/// Yields the options current at the moment a run starts.
///
/// The executor calls [`current`](Self::current) once per run, so a source may
/// hand out different values between runs.
pub trait OptionsSource: Send + Sync {
    /// Returns the options for the run about to start.
    fn current(&self) -> PipelineOptions;
}

impl OptionsSource for PipelineOptions {
    fn current(&self) -> PipelineOptions {
        *self
    }
}

impl<F> OptionsSource for F
where
    F: Fn() -> PipelineOptions + Send + Sync,
{
    fn current(&self) -> PipelineOptions {
        self()
    }
}

#[cfg(feature = "watch")]
impl OptionsSource for tokio::sync::watch::Receiver<PipelineOptions> {
    fn current(&self) -> PipelineOptions {
        *self.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_disable_both_phases() {
        let options = PipelineOptions::default();
        assert!(!options.setup_enabled);
        assert!(!options.cleanup_enabled);
    }

    #[test]
    fn test_builder_methods() {
        let options = PipelineOptions::default()
            .with_setup(true)
            .with_cleanup(true)
            .with_setup(false);
        assert_eq!(
            options,
            PipelineOptions {
                setup_enabled: false,
                cleanup_enabled: true,
            }
        );
    }

    #[test]
    fn test_fixed_source() {
        let options = PipelineOptions::default().with_setup(true);
        assert_eq!(options.current(), options);
    }

    #[test]
    fn test_closure_source_is_called_per_read() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        let cleanup = Arc::new(AtomicBool::new(false));
        let flag = cleanup.clone();
        let source = move || PipelineOptions::default().with_cleanup(flag.load(Ordering::SeqCst));

        assert!(!source.current().cleanup_enabled);
        cleanup.store(true, Ordering::SeqCst);
        assert!(source.current().cleanup_enabled);
    }

    #[test]
    fn test_closure_source_as_trait_object() {
        let source: Box<dyn OptionsSource> =
            Box::new(|| PipelineOptions::default().with_setup(true));
        assert!(source.current().setup_enabled);
    }

    #[cfg(feature = "watch")]
    #[test]
    fn test_watch_receiver_source() {
        let (sender, receiver) = tokio::sync::watch::channel(PipelineOptions::default());
        assert_eq!(receiver.current(), PipelineOptions::default());

        sender.send_replace(PipelineOptions::default().with_cleanup(true));
        assert!(receiver.current().cleanup_enabled);
    }

    #[test]
    fn test_deserialize_partial() {
        let options: PipelineOptions =
            serde_json::from_str(r#"{ "cleanup_enabled": true }"#).expect("valid options");
        assert!(options.cleanup_enabled);
        assert!(!options.setup_enabled);

        let options: PipelineOptions = serde_json::from_str("{}").expect("valid options");
        assert_eq!(options, PipelineOptions::default());
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&PipelineOptions::default().with_setup(true))
            .expect("serializable");
        assert_eq!(json, r#"{"setup_enabled":true,"cleanup_enabled":false}"#);
    }
}
