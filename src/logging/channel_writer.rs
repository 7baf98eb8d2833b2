//! Tracing output routed through a registry channel
//!
//! Diagnostics are written to whatever is active on the channel at the time of the
//! event, so they are teed into an active capture like any other console output.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::capture::{Channel, ChannelRegistry, ChannelWriter};

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "console_tee=info";

/// Writer factory for tracing-subscriber
#[derive(Debug, Clone)]
pub struct ChannelWriterMaker {
    registry: Arc<ChannelRegistry>,
    channel: Channel,
}

impl ChannelWriterMaker {
    pub fn new(registry: Arc<ChannelRegistry>, channel: Channel) -> Self {
        Self { registry, channel }
    }
}

impl<'a> MakeWriter<'a> for ChannelWriterMaker {
    type Writer = ChannelWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.registry.writer(self.channel)
    }
}

/// Initialize the global subscriber, writing diagnostics to the Stderr channel
pub fn init_channel_logging(registry: Arc<ChannelRegistry>) -> Result<()> {
    let writer = ChannelWriterMaker::new(registry, Channel::Stderr);

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_FILTER.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{shared, CaptureBuffer, ChannelCapturer, FailurePolicy};

    fn registry() -> (Arc<ChannelRegistry>, CaptureBuffer) {
        let err = CaptureBuffer::new();
        let registry = Arc::new(ChannelRegistry::new(
            shared(CaptureBuffer::new()),
            shared(err.clone()),
        ));
        (registry, err)
    }

    fn subscriber(registry: &Arc<ChannelRegistry>) -> impl tracing::Subscriber + Send + Sync {
        tracing_subscriber::fmt()
            .with_writer(ChannelWriterMaker::new(Arc::clone(registry), Channel::Stderr))
            .with_ansi(false)
            .finish()
    }

    #[test]
    fn test_events_reach_channel() {
        let (registry, err) = registry();

        tracing::subscriber::with_default(subscriber(&registry), || {
            tracing::warn!("Dump path is not a directory");
        });

        let text = err.text();
        assert!(text.contains("WARN"));
        assert!(text.contains("Dump path is not a directory"));
    }

    #[test]
    fn test_double_start_warning_lands_in_capture() {
        let (registry, err) = registry();
        let mut capturer = ChannelCapturer::new(
            Arc::clone(&registry),
            Channel::Stderr,
            registry.active(Channel::Stderr),
            true,
            FailurePolicy::BestEffort,
        );

        tracing::subscriber::with_default(subscriber(&registry), || {
            capturer.start();
            capturer.start();
        });

        // The warning goes through the channel being captured
        assert!(capturer.buffer().contains("Capturing is already active."));
        assert!(err.text().contains("Capturing is already active."));
    }
}
