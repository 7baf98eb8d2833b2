//! Stream capture
//!
//! Tees the stdout and stderr channels of a [`ChannelRegistry`] into in-memory
//! buffers that a [`CaptureSession`] can later write to a dump file.

mod buffer;
mod capturer;
mod channel;
mod destination;
mod fanout;
mod session;

pub use buffer::CaptureBuffer;
pub use capturer::ChannelCapturer;
pub use channel::{Channel, ChannelRegistry, ChannelWriter};
pub use destination::{same_destination, shared, Destination, SharedDestination, StdStream};
pub use fanout::{FailurePolicy, FanOut};
pub use session::{CaptureSession, CaptureSessionBuilder};
