//! Fan-out writer that duplicates every call to a fixed set of sinks

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use super::destination::{lock, Destination, SharedDestination};

/// What a fan-out does when one of its sinks fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Keep forwarding to the remaining sinks, then report the first failure
    #[default]
    BestEffort,
    /// Stop at the first failing sink and report it
    FailFast,
}

/// Forwards `write`, `flush` and `close` to every sink in registration order
///
/// The sink list is fixed at construction.
pub struct FanOut {
    sinks: Vec<SharedDestination>,
    policy: FailurePolicy,
}

impl FanOut {
    /// Create a fan-out over the given sinks
    pub fn new(sinks: Vec<SharedDestination>, policy: FailurePolicy) -> Self {
        Self { sinks, policy }
    }

    fn for_each_sink<F>(&self, mut op: F) -> io::Result<()>
    where
        F: FnMut(&mut dyn Destination) -> io::Result<()>,
    {
        let mut first_error = None;

        for sink in &self.sinks {
            let result = {
                let mut guard = lock(sink);
                op(&mut *guard)
            };

            if let Err(e) = result {
                match self.policy {
                    FailurePolicy::FailFast => return Err(e),
                    FailurePolicy::BestEffort => {
                        first_error.get_or_insert(e);
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for FanOut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanOut")
            .field("sinks", &self.sinks.len())
            .field("policy", &self.policy)
            .finish()
    }
}

impl Write for FanOut {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.for_each_sink(|sink| sink.write_all(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.for_each_sink(|sink| sink.flush())
    }
}

impl Destination for FanOut {
    fn close(&mut self) -> io::Result<()> {
        self.for_each_sink(|sink| sink.close())
    }
}
