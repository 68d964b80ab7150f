//! The lock-check primitive.
//!
//! A probe is one attempt to open a file with exclusive write access,
//! released immediately. The check is OS-dependent, so it lives behind
//! the [`LockProbe`] capability; the polling logic in this module's
//! sibling never touches the filesystem itself.

use crate::error::{FilegateError, Result};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io;
use std::path::Path;

/// Result of a single lock check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStatus {
    /// Another actor holds a conflicting write lock on the file.
    Locked,
    /// The file could be opened for exclusive write access.
    Unlocked,
}

impl ProbeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeStatus::Locked => "locked",
            ProbeStatus::Unlocked => "unlocked",
        }
    }
}

impl std::fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability interface for the OS-specific lock check.
///
/// Alternate platforms (or tests) supply their own implementation without
/// touching the polling logic.
pub trait LockProbe {
    /// Check once whether `path` is open for writing by another actor.
    ///
    /// # Errors
    ///
    /// - `NotFound` when `path` does not refer to an existing file.
    /// - `PermissionDenied` when the caller may not query the lock state.
    ///   This is surfaced, never reported as `Locked`.
    /// - `UserError` when `path` is not a regular file.
    fn probe(&self, path: &Path) -> Result<ProbeStatus>;
}

/// Production probe: open the file read/write and take a non-blocking
/// exclusive advisory lock on the handle, releasing it immediately.
///
/// On Windows an open can already fail with a sharing violation when the
/// writer opened the file without share-write; that also reports
/// `Locked`. On POSIX the open succeeds regardless, and the advisory
/// `flock` on the handle is the portable approximation of "open for
/// writing elsewhere".
#[derive(Debug, Default, Clone, Copy)]
pub struct ExclusiveOpenProbe;

impl LockProbe for ExclusiveOpenProbe {
    fn probe(&self, path: &Path) -> Result<ProbeStatus> {
        let metadata =
            std::fs::metadata(path).map_err(|e| FilegateError::from_io(path, e))?;
        if !metadata.is_file() {
            return Err(FilegateError::UserError(format!(
                "'{}' is not a regular file; only regular files can be probed for write locks",
                path.display()
            )));
        }

        let file = match OpenOptions::new().read(true).write(true).open(path) {
            Ok(file) => file,
            Err(e) if is_sharing_violation(&e) => return Ok(ProbeStatus::Locked),
            Err(e) => return Err(FilegateError::from_io(path, e)),
        };

        let mut handle = fd_lock::RwLock::new(file);
        match handle.try_write() {
            Ok(guard) => {
                // Release straight away; the probe only observes state.
                drop(guard);
                Ok(ProbeStatus::Unlocked)
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(ProbeStatus::Locked),
            Err(e) => Err(FilegateError::from_io(path, e)),
        }
    }
}

/// ERROR_SHARING_VIOLATION (32): the file is open elsewhere without
/// share-write, which is exactly the "locked" answer we are probing for.
#[cfg(windows)]
fn is_sharing_violation(err: &io::Error) -> bool {
    err.raw_os_error() == Some(32)
}

#[cfg(not(windows))]
fn is_sharing_violation(_err: &io::Error) -> bool {
    false
}
