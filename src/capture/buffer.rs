//! In-memory capture buffer
//!
//! A growable byte buffer shared between a capturer and the fan-out installed on its
//! channel. Cloning yields another handle to the same bytes.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

use super::destination::Destination;

/// Thread-safe, growable byte buffer
#[derive(Debug, Clone, Default)]
pub struct CaptureBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl CaptureBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    fn bytes(&self) -> MutexGuard<'_, Vec<u8>> {
        self.bytes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Buffered bytes decoded as text
    ///
    /// Invalid UTF-8 sequences are replaced rather than rejected.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes()).into_owned()
    }

    /// Number of buffered bytes
    pub fn len(&self) -> usize {
        self.bytes().len()
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all buffered bytes
    pub fn clear(&self) {
        self.bytes().clear();
    }
}

impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// Closing a capture buffer keeps its contents readable.
impl Destination for CaptureBuffer {}
