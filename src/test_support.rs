//! Shared fakes for gate, fsops, and transfer tests.
//!
//! The gate takes its capabilities by reference, so these fakes use
//! interior mutability (tests are single-threaded) and record what the
//! code under test did: how many probes ran, how long it slept, and what
//! it logged.

use crate::error::{FilegateError, Result};
use crate::gate::{Clock, LockProbe, ProbeStatus, Sleep};
use crate::logging::Log;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::path::Path;
use std::time::{Duration, Instant};

/// Probe that replays a scripted sequence of results, then repeats the
/// final entry forever. Records the number of calls.
pub(crate) struct ScriptedProbe {
    script: RefCell<VecDeque<ProbeStatus>>,
    fallback: ProbeStatus,
    calls: Cell<usize>,
}

impl ScriptedProbe {
    pub(crate) fn new(script: &[ProbeStatus], fallback: ProbeStatus) -> Self {
        ScriptedProbe {
            script: RefCell::new(script.iter().copied().collect()),
            fallback,
            calls: Cell::new(0),
        }
    }

    pub(crate) fn always(status: ProbeStatus) -> Self {
        ScriptedProbe::new(&[], status)
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl LockProbe for ScriptedProbe {
    fn probe(&self, _path: &Path) -> Result<ProbeStatus> {
        self.calls.set(self.calls.get() + 1);
        Ok(self
            .script
            .borrow_mut()
            .pop_front()
            .unwrap_or(self.fallback))
    }
}

/// Probe that always fails with `NotFound`, for error-propagation tests.
pub(crate) struct NotFoundProbe;

impl LockProbe for NotFoundProbe {
    fn probe(&self, path: &Path) -> Result<ProbeStatus> {
        Err(FilegateError::NotFound(path.to_path_buf()))
    }
}

/// Clock whose time only moves when a fake sleep advances it.
pub(crate) struct FakeClock {
    base: Instant,
    offset: Cell<Duration>,
}

impl FakeClock {
    pub(crate) fn new() -> Self {
        FakeClock {
            base: Instant::now(),
            offset: Cell::new(Duration::ZERO),
        }
    }

    pub(crate) fn advance(&self, duration: Duration) {
        self.offset.set(self.offset.get() + duration);
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.offset.get()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.base + self.offset.get()
    }
}

/// Sleep that advances the fake clock instead of blocking, recording each
/// requested duration.
pub(crate) struct FakeSleep<'a> {
    clock: &'a FakeClock,
    slept: RefCell<Vec<Duration>>,
}

impl<'a> FakeSleep<'a> {
    pub(crate) fn new(clock: &'a FakeClock) -> Self {
        FakeSleep {
            clock,
            slept: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn count(&self) -> usize {
        self.slept.borrow().len()
    }
}

impl Sleep for FakeSleep<'_> {
    fn sleep(&self, duration: Duration) {
        self.slept.borrow_mut().push(duration);
        self.clock.advance(duration);
    }
}

/// Logger that captures lines in memory.
pub(crate) struct MemoryLogger {
    lines: RefCell<Vec<String>>,
}

impl MemoryLogger {
    pub(crate) fn new() -> Self {
        MemoryLogger {
            lines: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

impl Log for MemoryLogger {
    fn log(&self, message: &str) {
        self.lines.borrow_mut().push(message.to_string());
    }
}
