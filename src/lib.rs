//! console-tee - timestamped console logging with stdout/stderr capture
//!
//! Console output goes through a [`capture::ChannelRegistry`]; a
//! [`capture::CaptureSession`] tees it into memory and writes dated dump files.

pub mod alert;
pub mod ansi;
pub mod capture;
pub mod config;
pub mod console;
pub mod dump;
pub mod logging;
