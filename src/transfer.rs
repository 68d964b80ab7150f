//! Batch transfer-and-poll.
//!
//! Copies every file in a source folder whose name matches a
//! case-insensitive regex into a destination folder, then polls a third
//! folder until files with the same names show up there or a deadline
//! expires. This covers hand-off pipelines where a downstream process
//! picks files up from the destination and drops results (possibly
//! renamed) into the poll folder.
//!
//! # Fuzzy matching
//!
//! When the pattern contains a capturing group, group 1 of each file name
//! is the comparison key; otherwise the whole file name is. This lets a
//! pipeline that decorates file names in flight (for example a batch
//! identifier kept, a timestamp suffix added) still be matched, as long
//! as the group survives the rename. Without a capturing group the names
//! must match 1:1 between source and poll folder.
//!
//! The pattern is matched from the start of the file name; keys are
//! compared case-sensitively even though the pattern itself is
//! case-insensitive.

use crate::error::{FilegateError, Result};
use crate::gate::{Clock, Sleep, describe_interval};
use crate::logging::Log;
use chrono::{DateTime, Local};
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default deadline for the poll phase.
pub const DEFAULT_TRANSFER_TIMEOUT: Duration = Duration::from_secs(300);

/// Default interval between poll-folder scans.
pub const DEFAULT_TRANSFER_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Compile a transfer pattern. Matching is case-insensitive, as file
/// names usually are on the systems these pipelines run against.
pub fn compile_pattern(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| FilegateError::UserError(format!("invalid pattern '{}': {}", pattern, e)))
}

/// One batch transfer: the three folders, the pattern, and the wait
/// budget for the poll phase.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub source_dir: PathBuf,
    pub destination_dir: PathBuf,
    pub poll_dir: PathBuf,
    pub pattern: Regex,
    pub timeout: Duration,
    pub poll_interval: Duration,
}

/// Terminal result of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferOutcome {
    /// Every expected key appeared in the poll folder before the deadline.
    Completed,
    /// The deadline passed with keys still missing.
    TimedOut,
}

/// Machine-readable summary of a transfer run.
#[derive(Debug, Clone, Serialize)]
pub struct TransferReport {
    pub started_at: DateTime<Local>,
    pub outcome: TransferOutcome,
    /// File names copied from the source folder.
    pub copied: Vec<String>,
    /// Comparison keys awaited in the poll folder.
    pub expected: Vec<String>,
}

/// The transfer runner, with the same injected time capabilities as the
/// gate so the poll phase is testable without real sleeping.
pub struct Transfer<'a> {
    clock: &'a dyn Clock,
    sleep: &'a dyn Sleep,
    logger: &'a dyn Log,
}

impl<'a> Transfer<'a> {
    pub fn new(clock: &'a dyn Clock, sleep: &'a dyn Sleep, logger: &'a dyn Log) -> Self {
        Transfer {
            clock,
            sleep,
            logger,
        }
    }

    /// Copy the matching files, then poll until they appear downstream or
    /// the deadline passes.
    pub fn run(&self, request: &TransferRequest) -> Result<TransferReport> {
        let started_at = Local::now();

        let copied = self.copy_to_destination(request)?;
        let expected: Vec<String> = copied
            .iter()
            .map(|name| match_key(&request.pattern, name))
            .collect();

        if expected.is_empty() {
            self.logger.log(&format!(
                "no files matching the pattern in '{}'; nothing to wait for",
                request.source_dir.display()
            ));
            return Ok(TransferReport {
                started_at,
                outcome: TransferOutcome::Completed,
                copied,
                expected,
            });
        }

        self.logger.log(&format!(
            "waiting for {:?} to appear in '{}'",
            expected,
            request.poll_dir.display()
        ));

        let outcome = self.poll_for_keys(request, &expected)?;
        Ok(TransferReport {
            started_at,
            outcome,
            copied,
            expected,
        })
    }

    fn copy_to_destination(&self, request: &TransferRequest) -> Result<Vec<String>> {
        let names = matching_names(&request.source_dir, &request.pattern)?;
        self.logger.log(&format!(
            "found {} file(s) matching the pattern in '{}'",
            names.len(),
            request.source_dir.display()
        ));

        for name in &names {
            let source = request.source_dir.join(name);
            let destination = request.destination_dir.join(name);
            self.logger.log(&format!(
                "copying '{}' to '{}'",
                source.display(),
                request.destination_dir.display()
            ));
            fs::copy(&source, &destination).map_err(|e| {
                FilegateError::UserError(format!(
                    "failed to copy '{}' to '{}': {}",
                    source.display(),
                    destination.display(),
                    e
                ))
            })?;
        }

        Ok(names)
    }

    fn poll_for_keys(
        &self,
        request: &TransferRequest,
        expected: &[String],
    ) -> Result<TransferOutcome> {
        let started = self.clock.now();

        loop {
            let present: Vec<String> = matching_names(&request.poll_dir, &request.pattern)?
                .iter()
                .map(|name| match_key(&request.pattern, name))
                .collect();

            if expected.iter().all(|key| present.contains(key)) {
                self.logger.log(&format!(
                    "all expected files have appeared in '{}'",
                    request.poll_dir.display()
                ));
                return Ok(TransferOutcome::Completed);
            }

            if self.clock.now().duration_since(started) >= request.timeout {
                break;
            }

            self.logger.log(&format!(
                "'{}' does not yet have all expected files; checking again in {}",
                request.poll_dir.display(),
                describe_interval(request.poll_interval)
            ));
            self.sleep.sleep(request.poll_interval);

            if self.clock.now().duration_since(started) >= request.timeout {
                break;
            }
        }

        self.logger.log(&format!(
            "expected files did not appear in '{}' within {}; giving up",
            request.poll_dir.display(),
            describe_interval(request.timeout)
        ));
        Ok(TransferOutcome::TimedOut)
    }
}

/// File names in `dir` whose name matches `pattern` at the start, sorted
/// for deterministic logs. Subdirectories are ignored.
fn matching_names(dir: &Path, pattern: &Regex) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir).map_err(|e| FilegateError::from_io(dir, e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| FilegateError::from_io(dir, e))?;
        let file_type = entry
            .file_type()
            .map_err(|e| FilegateError::from_io(&entry.path(), e))?;
        if !file_type.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str()
            && matches_at_start(pattern, name)
        {
            names.push(name.to_string());
        }
    }

    names.sort();
    Ok(names)
}

/// Anchored-at-start match, so a pattern like `order` matches
/// `order_17.txt` but not `backorder.txt`.
fn matches_at_start(pattern: &Regex, name: &str) -> bool {
    pattern.find(name).is_some_and(|m| m.start() == 0)
}

/// Comparison key for a file name: capture group 1 when present and
/// participating in the match, else the whole name.
fn match_key(pattern: &Regex, name: &str) -> String {
    pattern
        .captures(name)
        .and_then(|captures| captures.get(1))
        .map(|group| group.as_str().to_string())
        .unwrap_or_else(|| name.to_string())
}
