//! Guarded single-file move.
//!
//! On POSIX filesystems a move is normally an atomic `rename(2)`. Some
//! environments (certain mounts, containers, or cross-volume configs)
//! surface `EXDEV` ("Invalid cross-device link") even when paths look
//! local; for those we fall back to copy + delete.

use super::options::MoveOptions;
use super::{check_destination, ensure_parent, wait_for_unlocked};
use crate::error::{FilegateError, Result};
use crate::gate::Gate;
use std::fs;
use std::io;
use std::path::Path;

/// Move `source` to `destination` once the availability gate reports the
/// source unlocked.
///
/// - Polls the source with `options.guard` first; a timeout fails with
///   `FileLocked` and performs no file operation.
/// - A source name that does not pass `options.filters` is skipped
///   (logged, success, no operation).
/// - Refuses to overwrite an existing destination unless `options.force`.
/// - Creates missing destination parent directories.
pub fn guarded_move(
    gate: &Gate,
    source: &Path,
    destination: &Path,
    options: &MoveOptions,
) -> Result<()> {
    if let Some(name) = source.file_name().and_then(|n| n.to_str())
        && !options.filters.matches(name)
    {
        gate.logger().log(&format!(
            "'{}' does not match the provided filters; nothing to move",
            source.display()
        ));
        return Ok(());
    }

    check_destination(destination, options.force)?;
    wait_for_unlocked(gate, source, &options.guard)?;

    ensure_parent(destination)?;

    match fs::rename(source, destination) {
        Ok(()) => {}
        Err(e) if is_cross_device_rename(&e) => {
            move_cross_device(source, destination, e)?;
        }
        Err(e) => {
            return Err(FilegateError::UserError(format!(
                "failed to move '{}' to '{}': {}",
                source.display(),
                destination.display(),
                e
            )));
        }
    }

    gate.logger().log(&format!(
        "moved '{}' to '{}'",
        source.display(),
        destination.display()
    ));
    Ok(())
}

fn move_cross_device(source: &Path, destination: &Path, original_error: io::Error) -> Result<()> {
    fs::copy(source, destination).map_err(|e| {
        FilegateError::UserError(format!(
            "failed to copy '{}' to '{}' for cross-device move: {} (original rename error: {})",
            source.display(),
            destination.display(),
            e,
            original_error
        ))
    })?;

    fs::remove_file(source).map_err(|e| {
        FilegateError::UserError(format!(
            "moved file across devices but failed to delete source '{}': {}",
            source.display(),
            e
        ))
    })?;

    Ok(())
}

fn is_cross_device_rename(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::CrossesDevices || err.raw_os_error() == Some(18)
}
