//! The poll loop: repeated probing until the file is free or the deadline
//! passes.
//!
//! The loop is an explicit state machine (`Probing` -> `Waiting` ->
//! `Probing` | terminal) rather than an ad-hoc `loop { sleep }`, so the
//! deadline arithmetic is exercised in tests with a fake clock and no real
//! sleeping.

use super::Gate;
use crate::error::{FilegateError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// One poll call: the target path plus its wait budget.
///
/// Invariants: `poll_interval > 0` (enforced by [`PollRequest::new`]);
/// `timeout` may be zero, which means "at most one probe, no sleep".
#[derive(Debug, Clone)]
pub struct PollRequest {
    pub path: PathBuf,
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl PollRequest {
    /// Build a validated poll request.
    pub fn new(path: &Path, timeout: Duration, poll_interval: Duration) -> Result<Self> {
        if poll_interval.is_zero() {
            return Err(FilegateError::UserError(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        Ok(PollRequest {
            path: path.to_path_buf(),
            timeout,
            poll_interval,
        })
    }
}

/// Terminal result of a poll.
///
/// `NotFound` and `PermissionDenied` are errors, not outcomes; they abort
/// the loop immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PollOutcome {
    /// The gate opened before the deadline.
    Unlocked,
    /// The file was still locked when the deadline passed.
    TimedOut,
}

impl PollOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            PollOutcome::Unlocked => "unlocked",
            PollOutcome::TimedOut => "timed_out",
        }
    }
}

impl std::fmt::Display for PollOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Poll loop states. `Unlocked` and `TimedOut` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PollState {
    Probing,
    Waiting,
    Unlocked,
    TimedOut,
}

impl Gate<'_> {
    /// Probe `request.path` repeatedly until it is unlocked or the
    /// deadline passes.
    ///
    /// An unlocked probe short-circuits immediately with no extra wait.
    /// Each failed probe logs one line naming the path and the wait
    /// interval; reaching the deadline logs one terminal line. Probe
    /// errors propagate without being caught.
    pub fn poll(&self, request: &PollRequest) -> Result<PollOutcome> {
        let started = self.clock.now();
        let mut state = PollState::Probing;

        loop {
            state = match state {
                PollState::Probing => match self.probe(&request.path)? {
                    super::ProbeStatus::Unlocked => PollState::Unlocked,
                    super::ProbeStatus::Locked => PollState::Waiting,
                },

                PollState::Waiting => {
                    // Deadline check before sleeping covers timeout == 0:
                    // exactly one probe, no sleep.
                    if self.clock.now().duration_since(started) >= request.timeout {
                        PollState::TimedOut
                    } else {
                        self.logger.log(&format!(
                            "'{}' is locked; waiting {} before the next probe",
                            request.path.display(),
                            describe_interval(request.poll_interval)
                        ));
                        self.sleep.sleep(request.poll_interval);

                        if self.clock.now().duration_since(started) >= request.timeout {
                            PollState::TimedOut
                        } else {
                            PollState::Probing
                        }
                    }
                }

                PollState::Unlocked => return Ok(PollOutcome::Unlocked),

                PollState::TimedOut => {
                    self.logger.log(&format!(
                        "'{}' is still locked after {}; giving up",
                        request.path.display(),
                        describe_interval(request.timeout)
                    ));
                    return Ok(PollOutcome::TimedOut);
                }
            };
        }
    }
}

/// Human-readable duration for log lines, pluralized correctly
/// ("1 second" vs "2 seconds"). Sub-second durations are reported in
/// milliseconds with the same rule.
pub(crate) fn describe_interval(interval: Duration) -> String {
    if interval < Duration::from_secs(1) {
        let millis = interval.as_millis();
        format!(
            "{} millisecond{}",
            millis,
            if millis == 1 { "" } else { "s" }
        )
    } else {
        let secs = interval.as_secs();
        format!("{} second{}", secs, if secs == 1 { "" } else { "s" })
    }
}
