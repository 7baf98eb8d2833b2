//! Logging system for console-tee
//!
//! Routes `tracing` diagnostics through the Stderr channel of a registry.

mod channel_writer;

pub use channel_writer::{init_channel_logging, ChannelWriterMaker, DEFAULT_FILTER};
