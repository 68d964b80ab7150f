//! Guarded copy for files and directory trees.

use super::options::CopyOptions;
use super::{check_destination, ensure_parent, wait_for_unlocked};
use crate::error::{FilegateError, Result};
use crate::gate::{Gate, ProbeStatus};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// What a guarded copy actually did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopySummary {
    pub files_copied: u64,
    pub files_skipped: u64,
}

/// Copy `source` to `destination` once the availability gate reports the
/// source unlocked.
///
/// A file source is polled with `options.guard` up front; a timeout fails
/// with `FileLocked` before any data moves. A directory source requires
/// `options.recursive` and walks the tree, applying the name filters per
/// file and probing each file once right before copying it; a file
/// observed locked during the walk fails the whole copy.
pub fn guarded_copy(
    gate: &Gate,
    source: &Path,
    destination: &Path,
    options: &CopyOptions,
) -> Result<CopySummary> {
    let metadata = fs::metadata(source).map_err(|e| FilegateError::from_io(source, e))?;

    if metadata.is_dir() {
        if !options.recursive {
            return Err(FilegateError::UserError(format!(
                "'{}' is a directory (use --recursive to copy directory trees)",
                source.display()
            )));
        }
        let mut summary = CopySummary::default();
        copy_dir_recursive(gate, source, destination, source, options, &mut summary)?;
        return Ok(summary);
    }

    // Single-file copy.
    let mut summary = CopySummary::default();
    if let Some(name) = source.file_name().and_then(|n| n.to_str())
        && !options.filters.matches(name)
    {
        gate.logger().log(&format!(
            "'{}' does not match the provided filters; nothing to copy",
            source.display()
        ));
        summary.files_skipped += 1;
        return Ok(summary);
    }

    check_destination(destination, options.force)?;
    wait_for_unlocked(gate, source, &options.guard)?;

    ensure_parent(destination)?;
    copy_file(gate, source, destination)?;
    summary.files_copied += 1;
    Ok(summary)
}

fn copy_file(gate: &Gate, source: &Path, destination: &Path) -> Result<()> {
    fs::copy(source, destination).map_err(|e| {
        FilegateError::UserError(format!(
            "failed to copy '{}' to '{}': {}",
            source.display(),
            destination.display(),
            e
        ))
    })?;
    gate.logger().log(&format!(
        "copied '{}' to '{}'",
        source.display(),
        destination.display()
    ));
    Ok(())
}

fn copy_dir_recursive(
    gate: &Gate,
    source_root: &Path,
    target_root: &Path,
    current: &Path,
    options: &CopyOptions,
    summary: &mut CopySummary,
) -> Result<()> {
    let entries = fs::read_dir(current).map_err(|e| FilegateError::from_io(current, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| FilegateError::from_io(current, e))?;
        let source_path = entry.path();

        let relative = source_path
            .strip_prefix(source_root)
            .map_err(|_| {
                FilegateError::UserError(format!(
                    "failed to compute the path of '{}' relative to '{}'",
                    source_path.display(),
                    source_root.display()
                ))
            })?;
        let target_path = target_root.join(relative);

        let file_type = entry
            .file_type()
            .map_err(|e| FilegateError::from_io(&source_path, e))?;

        if file_type.is_dir() {
            fs::create_dir_all(&target_path).map_err(|e| {
                FilegateError::UserError(format!(
                    "failed to create target directory '{}': {}",
                    target_path.display(),
                    e
                ))
            })?;
            copy_dir_recursive(gate, source_root, target_root, &source_path, options, summary)?;
        } else if file_type.is_file() {
            let name = entry.file_name();
            let matches = name
                .to_str()
                .map(|n| options.filters.matches(n))
                .unwrap_or(false);
            if !matches {
                summary.files_skipped += 1;
                continue;
            }

            check_destination(&target_path, options.force)?;

            // One probe per file, no polling budget here: a tree copy
            // should not stall for minutes on a busy producer.
            if gate.probe(&source_path)? == ProbeStatus::Locked {
                gate.logger().log(&format!(
                    "'{}' is open for writing; aborting the copy",
                    source_path.display()
                ));
                return Err(FilegateError::FileLocked {
                    path: source_path,
                    waited: Duration::ZERO,
                });
            }

            ensure_parent(&target_path)?;
            copy_file(gate, &source_path, &target_path)?;
            summary.files_copied += 1;
        }
        // Symlinks and other entry types are ignored.
    }

    Ok(())
}
