//! Reloadable options backed by a `tokio::sync::watch` channel.
//!
//! A bare `watch::Receiver<PipelineOptions>` is already an [`OptionsSource`];
//! [`WatchOptions`] bundles it with the channel constructor.

use tokio::sync::watch;
use weft_core::{OptionsSource, PipelineOptions};

/// An [`OptionsSource`] that always yields the latest value sent on its
/// channel. Runs already in flight keep the value they started with.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    receiver: watch::Receiver<PipelineOptions>,
}

impl WatchOptions {
    /// Creates a source and the sender that updates it.
    pub fn channel(initial: PipelineOptions) -> (watch::Sender<PipelineOptions>, Self) {
        let (sender, receiver) = watch::channel(initial);
        (sender, Self { receiver })
    }

    /// Wraps an existing receiver.
    pub fn new(receiver: watch::Receiver<PipelineOptions>) -> Self {
        Self { receiver }
    }
}

impl OptionsSource for WatchOptions {
    fn current(&self) -> PipelineOptions {
        self.receiver.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_latest_value() {
        let (sender, source) = WatchOptions::channel(PipelineOptions::default());
        assert_eq!(source.current(), PipelineOptions::default());

        let updated = PipelineOptions::default().with_cleanup(true);
        sender.send_replace(updated);
        assert_eq!(source.current(), updated);
    }

    #[test]
    fn test_wrapped_receiver_matches_bare_receiver() {
        let (sender, receiver) = watch::channel(PipelineOptions::default());
        let source = WatchOptions::new(receiver.clone());

        sender.send_replace(PipelineOptions::default().with_setup(true));
        assert_eq!(source.current(), receiver.current());
        assert!(source.current().setup_enabled);
    }

    #[test]
    fn test_keeps_last_value_after_sender_drops() {
        let initial = PipelineOptions::default().with_setup(true);
        let (sender, source) = WatchOptions::channel(initial);
        drop(sender);
        assert_eq!(source.current(), initial);
    }
}
