//! Byte-sink destinations that a channel can write into
//!
//! Anything implementing [`Destination`] can be installed on a channel: the real
//! terminal streams, files, capture buffers, fan-outs, or test doubles.

use std::fs::File;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

/// A byte sink with the minimal `write`/`flush`/`close` capability set
pub trait Destination: Write + Send {
    /// Release the destination. The default only flushes.
    fn close(&mut self) -> io::Result<()> {
        self.flush()
    }
}

/// Shared, lockable handle to a destination
pub type SharedDestination = Arc<Mutex<dyn Destination>>;

/// Wrap a destination into a shared handle
pub fn shared<D: Destination + 'static>(destination: D) -> SharedDestination {
    Arc::new(Mutex::new(destination))
}

/// Lock a destination, recovering from a poisoned mutex
pub(crate) fn lock(destination: &SharedDestination) -> MutexGuard<'_, dyn Destination + 'static> {
    destination
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Whether two handles point at the same destination
pub fn same_destination(a: &SharedDestination, b: &SharedDestination) -> bool {
    // Compare data pointers only; vtable pointers may differ across codegen units.
    std::ptr::eq(
        Arc::as_ptr(a) as *const u8,
        Arc::as_ptr(b) as *const u8,
    )
}

/// The process's real standard streams
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdStream {
    Stdout,
    Stderr,
}

impl Write for StdStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            StdStream::Stdout => io::stdout().write(buf),
            StdStream::Stderr => io::stderr().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            StdStream::Stdout => io::stdout().flush(),
            StdStream::Stderr => io::stderr().flush(),
        }
    }
}

// The process streams outlive any capture, so closing them only flushes.
impl Destination for StdStream {}

impl Destination for File {
    fn close(&mut self) -> io::Result<()> {
        self.flush()?;
        self.sync_all()
    }
}

impl Destination for Vec<u8> {}

impl Destination for io::Sink {}

#[cfg(test)]
pub(crate) mod testing {
    //! Test doubles shared by the capture tests

    use super::*;

    /// Records everything written and counts flushes and closes
    #[derive(Debug, Default)]
    pub struct Recorder {
        pub bytes: Vec<u8>,
        pub flushes: usize,
        pub closes: usize,
        pub fail_writes: bool,
    }

    impl Recorder {
        pub fn failing() -> Self {
            Self {
                fail_writes: true,
                ..Self::default()
            }
        }
    }

    impl Write for Recorder {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.fail_writes {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "recorder closed"));
            }
            self.bytes.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    impl Destination for Recorder {
        fn close(&mut self) -> io::Result<()> {
            self.closes += 1;
            Ok(())
        }
    }

    /// Shared recorder plus a typed handle for inspecting it
    pub fn recorder() -> (Arc<Mutex<Recorder>>, SharedDestination) {
        let typed = Arc::new(Mutex::new(Recorder::default()));
        let erased: SharedDestination = typed.clone();
        (typed, erased)
    }

    /// Text recorded so far
    pub fn recorded(recorder: &Arc<Mutex<Recorder>>) -> String {
        String::from_utf8_lossy(&recorder.lock().unwrap().bytes).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[test]
    fn test_same_destination() {
        let (_, a) = recorder();
        let (_, b) = recorder();
        let a2 = Arc::clone(&a);

        assert!(same_destination(&a, &a2));
        assert!(!same_destination(&a, &b));
    }

    #[test]
    fn test_default_close_flushes() {
        let mut sink: Vec<u8> = Vec::new();
        sink.write_all(b"abc").unwrap();
        sink.close().unwrap();
        assert_eq!(sink, b"abc");
    }

    #[test]
    fn test_file_destination() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("out.txt");
        let destination = shared(File::create(&path).unwrap());

        lock(&destination).write_all(b"to file").unwrap();
        lock(&destination).close().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "to file");
    }
}
