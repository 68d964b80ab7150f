//! Guarded file operations.
//!
//! Move and copy wrappers that consult the file availability gate before
//! touching the source. The underlying primitives (`fs::rename`,
//! `fs::copy`) do not reliably fail on a write-locked source and can
//! silently act on a partially written file, so the guard exists to make
//! "never operate on a file observed to be locked" an enforced contract:
//! a timed-out poll fails with `FileLocked` and performs no file
//! operation at all.
//!
//! The check is still advisory. A file can be locked again between the
//! gate's answer and the operation (TOCTOU); the wrappers do not re-check
//! and callers must tolerate that race.
//!
//! Also hosts [`is_empty`], a size-is-exactly-zero check used by cleanup
//! scripts.

mod copy;
mod move_file;
mod options;


pub use copy::{CopySummary, guarded_copy};
pub use move_file::guarded_move;
pub use options::{
    CopyOptions, DEFAULT_GUARD_POLL_INTERVAL, DEFAULT_GUARD_TIMEOUT, FilterSet, GuardOptions,
    MoveOptions,
};

use crate::error::{FilegateError, Result};
use crate::gate::{Gate, PollOutcome, PollRequest};
use std::fs;
use std::path::Path;

/// Whether the file's size is exactly zero bytes.
///
/// Fails with `NotFound` when the path does not exist and with
/// `UserError` when it is not a regular file.
pub fn is_empty(path: &Path) -> Result<bool> {
    let metadata = fs::metadata(path).map_err(|e| FilegateError::from_io(path, e))?;
    if !metadata.is_file() {
        return Err(FilegateError::UserError(format!(
            "'{}' is not a regular file",
            path.display()
        )));
    }
    Ok(metadata.len() == 0)
}

/// Poll the source with the guard budget; translate a timeout into the
/// hard `FileLocked` failure the wrappers promise.
fn wait_for_unlocked(gate: &Gate, path: &Path, guard: &options::GuardOptions) -> Result<()> {
    let request = PollRequest::new(path, guard.timeout, guard.poll_interval)?;
    match gate.poll(&request)? {
        PollOutcome::Unlocked => Ok(()),
        PollOutcome::TimedOut => Err(FilegateError::FileLocked {
            path: path.to_path_buf(),
            waited: guard.timeout,
        }),
    }
}

/// Create the destination's parent directory when missing.
fn ensure_parent(destination: &Path) -> Result<()> {
    if let Some(parent) = destination.parent()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            FilegateError::UserError(format!(
                "failed to create destination directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }
    Ok(())
}

/// Refuse to clobber an existing destination unless `force` was given.
fn check_destination(destination: &Path, force: bool) -> Result<()> {
    if destination.exists() && !force {
        return Err(FilegateError::UserError(format!(
            "destination '{}' already exists (use --force to overwrite)",
            destination.display()
        )));
    }
    Ok(())
}
