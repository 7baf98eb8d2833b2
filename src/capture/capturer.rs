//! Capture of a single output channel
//!
//! While capturing, the channel's active destination is a [`FanOut`] over the original
//! destination and the capturer's buffer, so output keeps reaching the terminal (or
//! whatever the original was) and is recorded at the same time.

use std::sync::Arc;

use super::buffer::CaptureBuffer;
use super::channel::{Channel, ChannelRegistry};
use super::destination::{same_destination, shared, SharedDestination};
use super::fanout::{FailurePolicy, FanOut};

/// Tees one channel of a registry into an in-memory buffer
pub struct ChannelCapturer {
    registry: Arc<ChannelRegistry>,
    channel: Channel,
    /// Destination restored on stop; never written to directly by the capturer
    original: SharedDestination,
    buffer: CaptureBuffer,
    /// The fan-out this capturer installed, while capturing
    installed: Option<SharedDestination>,
    continue_capture: bool,
    policy: FailurePolicy,
}

impl ChannelCapturer {
    /// Create a stopped capturer for `channel`
    ///
    /// `continue_capture` keeps buffered output across stop/start cycles.
    pub fn new(
        registry: Arc<ChannelRegistry>,
        channel: Channel,
        original: SharedDestination,
        continue_capture: bool,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            registry,
            channel,
            original,
            buffer: CaptureBuffer::new(),
            installed: None,
            continue_capture,
            policy,
        }
    }

    /// Begin teeing the channel into the buffer
    ///
    /// Starting twice only logs a warning. The fan-out replaces whatever is active on
    /// the channel at this moment, even if other code installed something since this
    /// capturer was created.
    pub fn start(&mut self) {
        if self.is_capturing() {
            tracing::warn!(channel = %self.channel, "Capturing is already active.");
            return;
        }

        if !self.continue_capture {
            self.buffer.clear();
        }

        let fanout = shared(FanOut::new(
            vec![Arc::clone(&self.original), shared(self.buffer.clone())],
            self.policy,
        ));
        self.registry.install(self.channel, Arc::clone(&fanout));
        self.installed = Some(fanout);

        tracing::debug!(channel = %self.channel, "Capture started");
    }

    /// Restore the original destination; a no-op when not capturing
    pub fn stop(&mut self) {
        if self.installed.take().is_none() {
            return;
        }

        self.registry.install(self.channel, Arc::clone(&self.original));

        if !self.continue_capture {
            self.buffer.clear();
        }

        tracing::debug!(channel = %self.channel, "Capture stopped");
    }

    /// Whether `start` has been called without a matching `stop`
    pub fn is_capturing(&self) -> bool {
        self.installed.is_some()
    }

    /// Whether this capturer's fan-out is still the channel's active destination
    ///
    /// Can be false while capturing if other code replaced the destination since.
    pub fn is_intercepting(&self) -> bool {
        match &self.installed {
            Some(fanout) => same_destination(fanout, &self.registry.active(self.channel)),
            None => false,
        }
    }

    /// Buffered output decoded as text; empty if never started
    pub fn buffer(&self) -> String {
        self.buffer.text()
    }

    /// The channel this capturer owns
    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn continue_capture(&self) -> bool {
        self.continue_capture
    }

    /// Change buffer retention for later start/stop calls
    pub fn set_continue_capture(&mut self, continue_capture: bool) {
        self.continue_capture = continue_capture;
    }
}

impl Drop for ChannelCapturer {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for ChannelCapturer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelCapturer")
            .field("channel", &self.channel)
            .field("capturing", &self.is_capturing())
            .field("continue_capture", &self.continue_capture)
            .field("buffered_bytes", &self.buffer.len())
            .finish()
    }
}
