//! Process-wide output channels
//!
//! A [`ChannelRegistry`] holds one slot per [`Channel`] naming the destination that
//! currently receives writes for it. Code that prints goes through the registry, so
//! capture works by swapping the slot rather than redirecting file descriptors.
//! Each slot has its own mutex guarding install and restore.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use serde::{Deserialize, Serialize};

use super::destination::{lock, shared, SharedDestination, StdStream};

/// One of the two global output channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Stdout,
    Stderr,
}

impl Channel {
    /// Both channels, primary first
    pub const ALL: [Channel; 2] = [Channel::Stdout, Channel::Stderr];

    /// Short name used in status text
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Stdout => "Output",
            Channel::Stderr => "Error",
        }
    }

    fn index(&self) -> usize {
        match self {
            Channel::Stdout => 0,
            Channel::Stderr => 1,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Active-destination slots for both channels
pub struct ChannelRegistry {
    slots: [Mutex<SharedDestination>; 2],
}

static GLOBAL: OnceLock<Arc<ChannelRegistry>> = OnceLock::new();

impl ChannelRegistry {
    /// Create a registry with explicit initial destinations
    pub fn new(stdout: SharedDestination, stderr: SharedDestination) -> Self {
        Self {
            slots: [Mutex::new(stdout), Mutex::new(stderr)],
        }
    }

    /// Create a registry bound to the process's real standard streams
    pub fn process() -> Self {
        Self::new(shared(StdStream::Stdout), shared(StdStream::Stderr))
    }

    /// The process-wide registry, bound to the real standard streams
    pub fn global() -> Arc<ChannelRegistry> {
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Self::process())))
    }

    fn slot(&self, channel: Channel) -> MutexGuard<'_, SharedDestination> {
        self.slots[channel.index()]
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// The destination currently receiving writes for `channel`
    pub fn active(&self, channel: Channel) -> SharedDestination {
        Arc::clone(&self.slot(channel))
    }

    /// Make `destination` the active one for `channel`, returning the one it replaced
    pub fn install(&self, channel: Channel, destination: SharedDestination) -> SharedDestination {
        std::mem::replace(&mut *self.slot(channel), destination)
    }

    /// Write all of `bytes` to the active destination of `channel`
    pub fn write(&self, channel: Channel, bytes: &[u8]) -> io::Result<()> {
        // Release the slot before writing so a slow sink never blocks install/restore.
        let destination = self.active(channel);
        let mut guard = lock(&destination);
        guard.write_all(bytes)
    }

    /// Flush the active destination of `channel`
    pub fn flush(&self, channel: Channel) -> io::Result<()> {
        let destination = self.active(channel);
        let mut guard = lock(&destination);
        guard.flush()
    }

    /// A writer that always targets whatever is active on `channel` at write time
    pub fn writer(self: &Arc<Self>, channel: Channel) -> ChannelWriter {
        ChannelWriter {
            registry: Arc::clone(self),
            channel,
        }
    }
}

impl fmt::Debug for ChannelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelRegistry").finish_non_exhaustive()
    }
}

/// `io::Write` adapter over a registry channel
#[derive(Debug, Clone)]
pub struct ChannelWriter {
    registry: Arc<ChannelRegistry>,
    channel: Channel,
}

impl ChannelWriter {
    /// The channel this writer targets
    pub fn channel(&self) -> Channel {
        self.channel
    }
}

impl Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.registry.write(self.channel, buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.registry.flush(self.channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::destination::same_destination;
    use crate::capture::destination::testing::*;

    #[test]
    fn test_write_reaches_active_destination() {
        let (out, out_dest) = recorder();
        let (err, err_dest) = recorder();
        let registry = ChannelRegistry::new(out_dest, err_dest);

        registry.write(Channel::Stdout, b"to out").unwrap();
        registry.write(Channel::Stderr, b"to err").unwrap();

        assert_eq!(recorded(&out), "to out");
        assert_eq!(recorded(&err), "to err");
    }

    #[test]
    fn test_install_returns_previous() {
        let (_, out_dest) = recorder();
        let (_, err_dest) = recorder();
        let (replacement, replacement_dest) = recorder();
        let registry = ChannelRegistry::new(Arc::clone(&out_dest), err_dest);

        let previous = registry.install(Channel::Stdout, replacement_dest);
        assert!(same_destination(&previous, &out_dest));

        registry.write(Channel::Stdout, b"redirected").unwrap();
        assert_eq!(recorded(&replacement), "redirected");
    }

    #[test]
    fn test_writer_follows_installs() {
        let (first, first_dest) = recorder();
        let (second, second_dest) = recorder();
        let (_, err_dest) = recorder();
        let registry = Arc::new(ChannelRegistry::new(first_dest, err_dest));
        let mut writer = registry.writer(Channel::Stdout);

        write!(writer, "a").unwrap();
        registry.install(Channel::Stdout, second_dest);
        write!(writer, "b").unwrap();

        assert_eq!(recorded(&first), "a");
        assert_eq!(recorded(&second), "b");
        assert_eq!(writer.channel(), Channel::Stdout);
    }

    #[test]
    fn test_channel_names() {
        assert_eq!(Channel::Stdout.to_string(), "Output");
        assert_eq!(Channel::Stderr.to_string(), "Error");
        assert_eq!(Channel::ALL, [Channel::Stdout, Channel::Stderr]);
    }

    #[test]
    fn test_global_registry_is_shared() {
        let a = ChannelRegistry::global();
        let b = ChannelRegistry::global();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
