//! File availability gate.
//!
//! This module answers one question: is a file currently open for writing
//! by another actor? It offers two operations:
//!
//! - [`Gate::probe`]: a single check, reported as [`ProbeStatus`].
//! - [`Gate::poll`]: repeated probing on a fixed interval until the file
//!   becomes available or a deadline expires, reported as [`PollOutcome`].
//!
//! # Capabilities
//!
//! The gate owns no platform behavior of its own. The lock check, the
//! clock, the sleep between probes, and the log sink are all injected:
//!
//! - [`LockProbe`]: the OS-specific lock check ([`ExclusiveOpenProbe`] in
//!   production).
//! - [`Clock`] / [`Sleep`]: monotonic time and blocking sleep
//!   ([`SystemClock`] / [`ThreadSleep`] in production).
//! - [`crate::logging::Log`]: one informational line per failed probe.
//!
//! Tests drive the poll loop with a scripted probe and a fake clock, so
//! deadline behavior is verified without real sleeping.
//!
//! # What this is not
//!
//! The gate only observes OS-reported lock state at the moment of each
//! probe. It is not a mutual-exclusion primitive: a file can be locked
//! again the instant after `Unlocked` is reported.

mod clock;
mod poll;
mod probe;


pub use clock::{Clock, Sleep, SystemClock, ThreadSleep};
pub use poll::{PollOutcome, PollRequest};
pub(crate) use poll::describe_interval;
pub use probe::{ExclusiveOpenProbe, LockProbe, ProbeStatus};

use crate::error::Result;
use crate::logging::Log;
use std::path::Path;

/// The file availability gate, bundling the injected capabilities.
///
/// Borrowed capabilities keep the gate cheap to construct per call; all
/// poll state lives on the stack of the `poll` invocation itself.
pub struct Gate<'a> {
    pub(crate) probe: &'a dyn LockProbe,
    pub(crate) clock: &'a dyn Clock,
    pub(crate) sleep: &'a dyn Sleep,
    pub(crate) logger: &'a dyn Log,
}

impl<'a> Gate<'a> {
    /// Build a gate from explicit capabilities.
    pub fn new(
        probe: &'a dyn LockProbe,
        clock: &'a dyn Clock,
        sleep: &'a dyn Sleep,
        logger: &'a dyn Log,
    ) -> Self {
        Gate {
            probe,
            clock,
            sleep,
            logger,
        }
    }

    /// Build a gate with the platform lock probe, the system clock, and
    /// real thread sleeps. Only the log sink remains caller-chosen.
    pub fn with_platform_defaults(logger: &'a dyn Log) -> Self {
        Gate {
            probe: &ExclusiveOpenProbe,
            clock: &SystemClock,
            sleep: &ThreadSleep,
            logger,
        }
    }

    /// The log sink this gate reports progress to.
    pub fn logger(&self) -> &dyn Log {
        self.logger
    }

    /// Check once whether `path` is currently open for writing.
    ///
    /// Fails with `NotFound` when the path does not exist and with
    /// `PermissionDenied` when the lock state cannot be queried.
    pub fn probe(&self, path: &Path) -> Result<ProbeStatus> {
        self.probe.probe(path)
    }
}
