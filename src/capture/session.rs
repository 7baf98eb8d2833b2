//! Capture sessions
//!
//! A [`CaptureSession`] owns one capturer per captured channel plus the directory
//! dumps are written to. Capture is on from the moment a session is built.
//!
//! Two sessions capturing the same channel of the same registry at once is not
//! supported: whichever starts or stops last decides the active destination.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local};

use super::capturer::ChannelCapturer;
use super::channel::{Channel, ChannelRegistry};
use super::destination::SharedDestination;
use super::fanout::FailurePolicy;
use crate::alert::{Alert, TerminalAlert};
use crate::dump::{self, DumpError};

/// Builder selecting channels, originals, retention and dump directory
pub struct CaptureSessionBuilder {
    registry: Arc<ChannelRegistry>,
    dump_dir: PathBuf,
    continue_capture: bool,
    channels: Vec<(Channel, Option<SharedDestination>)>,
    policy: FailurePolicy,
    alert: Arc<dyn Alert>,
}

impl CaptureSessionBuilder {
    fn new(dump_dir: impl Into<PathBuf>) -> Self {
        Self {
            registry: ChannelRegistry::global(),
            dump_dir: dump_dir.into(),
            continue_capture: true,
            channels: Channel::ALL.iter().map(|c| (*c, None)).collect(),
            policy: FailurePolicy::default(),
            alert: Arc::new(TerminalAlert::new()),
        }
    }

    /// Capture channels of `registry` instead of the process-wide one
    pub fn registry(mut self, registry: Arc<ChannelRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Keep buffered output across stop/start cycles (default `true`)
    pub fn continue_capture(mut self, continue_capture: bool) -> Self {
        self.continue_capture = continue_capture;
        self
    }

    /// Capture a single channel
    pub fn only(mut self, channel: Channel) -> Self {
        self.channels = vec![(channel, None)];
        self
    }

    /// Use `destination` as the original for `channel` instead of its active one
    pub fn original(mut self, channel: Channel, destination: SharedDestination) -> Self {
        match self.channels.iter_mut().find(|(c, _)| *c == channel) {
            Some((_, original)) => *original = Some(destination),
            None => self.channels.push((channel, Some(destination))),
        }
        self
    }

    /// How fan-outs react to a failing sink
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Notifier used by [`CaptureSession::dump_console`]
    pub fn alert(mut self, alert: Arc<dyn Alert>) -> Self {
        self.alert = alert;
        self
    }

    /// Build the session and start capturing every channel
    pub fn build(self) -> CaptureSession {
        let registry = self.registry;
        let continue_capture = self.continue_capture;
        let policy = self.policy;

        let mut channels = self.channels;
        channels.sort_by_key(|(channel, _)| Channel::ALL.iter().position(|c| c == channel));

        let capturers = channels
            .into_iter()
            .map(|(channel, original)| {
                let original = original.unwrap_or_else(|| registry.active(channel));
                ChannelCapturer::new(
                    Arc::clone(&registry),
                    channel,
                    original,
                    continue_capture,
                    policy,
                )
            })
            .collect();

        let mut session = CaptureSession {
            capturers,
            dump_dir: self.dump_dir,
            continue_capture,
            alert: self.alert,
        };
        session.start_capture();
        session
    }
}

/// User-facing handle over one or two channel capturers
pub struct CaptureSession {
    /// Primary channel first
    capturers: Vec<ChannelCapturer>,
    dump_dir: PathBuf,
    continue_capture: bool,
    alert: Arc<dyn Alert>,
}

impl CaptureSession {
    /// Capture stdout and stderr of the process-wide registry, keeping output across stops
    pub fn new(dump_dir: impl Into<PathBuf>) -> Self {
        Self::builder(dump_dir).build()
    }

    /// Capture stdout and stderr with explicit buffer retention
    pub fn with_continue_capture(dump_dir: impl Into<PathBuf>, continue_capture: bool) -> Self {
        Self::builder(dump_dir)
            .continue_capture(continue_capture)
            .build()
    }

    pub fn builder(dump_dir: impl Into<PathBuf>) -> CaptureSessionBuilder {
        CaptureSessionBuilder::new(dump_dir)
    }

    /// Start every capturer, primary first
    pub fn start_capture(&mut self) {
        for capturer in &mut self.capturers {
            capturer.start();
        }
    }

    /// Stop every capturer, primary first
    pub fn stop_capture(&mut self) {
        for capturer in &mut self.capturers {
            capturer.stop();
        }
    }

    /// One line per capturing channel, e.g. `Output is Capturing.`
    pub fn what_is_capturing(&self) -> String {
        let mut result = String::new();
        for capturer in self.capturers.iter().filter(|c| c.is_capturing()) {
            let _ = write!(result, "{} is Capturing.\r\n", capturer.channel());
        }
        result
    }

    /// Number of channels currently capturing (0, 1 or 2)
    pub fn capturing_count(&self) -> u8 {
        self.capturers.iter().filter(|c| c.is_capturing()).count() as u8
    }

    /// Whether this session owns both channels
    pub fn uses_two_channels(&self) -> bool {
        self.capturers.len() == 2
    }

    /// Channels owned by this session, primary first
    pub fn channels(&self) -> Vec<Channel> {
        self.capturers.iter().map(|c| c.channel()).collect()
    }

    /// Buffered text of `channel`, if this session captures it
    pub fn buffer(&self, channel: Channel) -> Option<String> {
        self.capturers
            .iter()
            .find(|c| c.channel() == channel)
            .map(|c| c.buffer())
    }

    pub fn dump_path(&self) -> &Path {
        &self.dump_dir
    }

    /// Directory for later dumps
    pub fn set_dump_path(&mut self, path: impl Into<PathBuf>) {
        self.dump_dir = path.into();
    }

    pub fn continue_capture(&self) -> bool {
        self.continue_capture
    }

    /// Buffer retention for later start/stop calls; already buffered output is kept
    pub fn set_continue_capture(&mut self, continue_capture: bool) {
        self.continue_capture = continue_capture;
        for capturer in &mut self.capturers {
            capturer.set_continue_capture(continue_capture);
        }
    }

    fn sections(&self) -> Vec<String> {
        self.capturers.iter().map(|c| c.buffer()).collect()
    }

    /// Write a dump named after `now`, leaving capture state untouched
    pub fn try_log_console_at(&self, now: &DateTime<Local>) -> Result<PathBuf, DumpError> {
        dump::write_dump(&self.dump_dir, now, &self.sections())
    }

    /// Write a dump named after the current local time
    pub fn try_log_console(&self) -> Result<PathBuf, DumpError> {
        self.try_log_console_at(&Local::now())
    }

    /// Write a dump, reporting any failure through the log instead of returning it
    pub fn log_console(&self) -> Option<PathBuf> {
        report(self.try_log_console())
    }

    /// Write a dump and notify the operator where it went
    ///
    /// Meant for fatal-error paths; blocks while the notice is shown.
    pub fn dump_console(&self) -> Option<PathBuf> {
        let result = report(self.try_log_console());

        let message = match &result {
            Some(path) => format!(
                "A fatal error has occurred. You can read the file dump here:\r\n{}",
                path.display()
            ),
            None => format!(
                "A fatal error has occurred. The console dump could not be written to:\r\n{}",
                dump::resolve_dump_dir(&self.dump_dir).display()
            ),
        };
        self.alert.error(None, &message);

        result
    }
}

fn report(result: Result<PathBuf, DumpError>) -> Option<PathBuf> {
    match result {
        Ok(path) => {
            tracing::info!("Console dump written to {}", path.display());
            Some(path)
        }
        Err(e @ DumpError::Io { .. }) => {
            tracing::error!("Failed to create the file. {}", e);
            None
        }
        Err(e) => {
            tracing::warn!("{}", e);
            None
        }
    }
}

impl std::fmt::Debug for CaptureSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureSession")
            .field("capturers", &self.capturers)
            .field("dump_dir", &self.dump_dir)
            .field("continue_capture", &self.continue_capture)
            .finish()
    }
}
