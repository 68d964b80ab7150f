//! Command implementations for filegate.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Handlers return the process exit code so commands
//! like `probe` and `transfer` can report non-error states (locked,
//! timed out) through distinct codes.

use crate::cli::{
    Command, CopyArgs, IsEmptyArgs, LogArgs, MoveArgs, PollArgs, ProbeArgs, TransferArgs,
};
use crate::error::{FilegateError, Result};
use crate::exit_codes;
use crate::fsops::{
    self, CopyOptions, FilterSet, GuardOptions, MoveOptions, guarded_copy, guarded_move,
};
use crate::gate::{Gate, PollOutcome, PollRequest, ProbeStatus, SystemClock, ThreadSleep};
use crate::logging::{ConsoleLogger, Log};
use crate::transfer::{Transfer, TransferOutcome, TransferRequest, compile_pattern};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Dispatch a command to its implementation.
///
/// Returns the process exit code on success; errors carry their own code.
pub fn dispatch(command: Command) -> Result<i32> {
    match command {
        Command::Probe(args) => cmd_probe(args),
        Command::Poll(args) => cmd_poll(args),
        Command::Move(args) => cmd_move(args),
        Command::Copy(args) => cmd_copy(args),
        Command::IsEmpty(args) => cmd_is_empty(args),
        Command::Log(args) => cmd_log(args),
        Command::Transfer(args) => cmd_transfer(args),
    }
}

/// JSON report for `probe --json`.
#[derive(Debug, Serialize)]
struct ProbeReport {
    path: PathBuf,
    status: ProbeStatus,
    checked_at: DateTime<Local>,
}

/// JSON report for `poll --json`.
#[derive(Debug, Serialize)]
struct PollReport {
    path: PathBuf,
    outcome: PollOutcome,
    timeout_secs: u64,
    poll_interval_secs: u64,
    finished_at: DateTime<Local>,
}

fn cmd_probe(args: ProbeArgs) -> Result<i32> {
    let logger = ConsoleLogger::new();
    let gate = Gate::with_platform_defaults(&logger);

    let status = gate.probe(&args.path)?;

    if args.json {
        print_json(&ProbeReport {
            path: args.path,
            status,
            checked_at: Local::now(),
        })?;
    } else {
        println!("{}", status);
    }

    Ok(match status {
        ProbeStatus::Unlocked => exit_codes::SUCCESS,
        ProbeStatus::Locked => exit_codes::FILE_LOCKED,
    })
}

fn cmd_poll(args: PollArgs) -> Result<i32> {
    let logger = ConsoleLogger::new();
    let gate = Gate::with_platform_defaults(&logger);

    let request = PollRequest::new(
        &args.path,
        Duration::from_secs(args.timeout),
        Duration::from_secs(args.poll_interval),
    )?;
    let outcome = gate.poll(&request)?;

    if args.json {
        print_json(&PollReport {
            path: args.path,
            outcome,
            timeout_secs: args.timeout,
            poll_interval_secs: args.poll_interval,
            finished_at: Local::now(),
        })?;
    } else {
        println!("{}", outcome);
    }

    Ok(match outcome {
        PollOutcome::Unlocked => exit_codes::SUCCESS,
        PollOutcome::TimedOut => exit_codes::FILE_LOCKED,
    })
}

fn cmd_move(args: MoveArgs) -> Result<i32> {
    let logger = ConsoleLogger::new();
    let gate = Gate::with_platform_defaults(&logger);

    let options = MoveOptions {
        force: args.force,
        filters: FilterSet::new(&args.include, &args.exclude)?,
        guard: GuardOptions {
            timeout: Duration::from_secs(args.timeout),
            poll_interval: Duration::from_secs(args.poll_interval),
        },
    };

    guarded_move(&gate, &args.source, &args.destination, &options)?;
    Ok(exit_codes::SUCCESS)
}

fn cmd_copy(args: CopyArgs) -> Result<i32> {
    let logger = ConsoleLogger::new();
    let gate = Gate::with_platform_defaults(&logger);

    let options = CopyOptions {
        force: args.force,
        recursive: args.recursive,
        filters: FilterSet::new(&args.include, &args.exclude)?,
        guard: GuardOptions {
            timeout: Duration::from_secs(args.timeout),
            poll_interval: Duration::from_secs(args.poll_interval),
        },
    };

    let summary = guarded_copy(&gate, &args.source, &args.destination, &options)?;
    println!(
        "Copied {} file(s), skipped {}.",
        summary.files_copied, summary.files_skipped
    );
    Ok(exit_codes::SUCCESS)
}

fn cmd_is_empty(args: IsEmptyArgs) -> Result<i32> {
    let empty = fsops::is_empty(&args.path)?;
    println!("{}", empty);
    Ok(exit_codes::SUCCESS)
}

fn cmd_log(args: LogArgs) -> Result<i32> {
    ConsoleLogger::new().log(&args.message);
    Ok(exit_codes::SUCCESS)
}

fn cmd_transfer(args: TransferArgs) -> Result<i32> {
    let logger = ConsoleLogger::new();
    let transfer = Transfer::new(&SystemClock, &ThreadSleep, &logger);

    let request = TransferRequest {
        source_dir: args.source_dir,
        destination_dir: args.destination_dir,
        poll_dir: args.poll_dir,
        pattern: compile_pattern(&args.pattern)?,
        timeout: Duration::from_secs(args.timeout),
        poll_interval: Duration::from_secs(args.poll_interval),
    };

    let report = transfer.run(&request)?;

    if args.json {
        print_json(&report)?;
    }

    Ok(match report.outcome {
        TransferOutcome::Completed => i32::from(args.success_code),
        TransferOutcome::TimedOut => i32::from(args.timeout_code),
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| FilegateError::UserError(format!("failed to render JSON report: {}", e)))?;
    println!("{}", rendered);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{IsEmptyArgs, ProbeArgs};
    use tempfile::TempDir;

    #[test]
    fn probe_command_reports_unlocked_with_success_code() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("free.txt");
        std::fs::write(&path, b"x").unwrap();

        let code = cmd_probe(ProbeArgs { path, json: false }).unwrap();
        assert_eq!(code, exit_codes::SUCCESS);
    }

    #[test]
    fn probe_command_propagates_not_found() {
        let temp = TempDir::new().unwrap();
        let err = cmd_probe(ProbeArgs {
            path: temp.path().join("missing.txt"),
            json: false,
        })
        .unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::NOT_FOUND);
    }

    #[test]
    fn is_empty_command_succeeds_either_way() {
        let temp = TempDir::new().unwrap();
        let empty = temp.path().join("empty.dat");
        let full = temp.path().join("full.dat");
        std::fs::write(&empty, b"").unwrap();
        std::fs::write(&full, b"x").unwrap();

        assert_eq!(
            cmd_is_empty(IsEmptyArgs { path: empty }).unwrap(),
            exit_codes::SUCCESS
        );
        assert_eq!(
            cmd_is_empty(IsEmptyArgs { path: full }).unwrap(),
            exit_codes::SUCCESS
        );
    }

    #[test]
    fn poll_command_with_zero_timeout_reports_quickly() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("free.txt");
        std::fs::write(&path, b"x").unwrap();

        let code = cmd_poll(PollArgs {
            path,
            timeout: 0,
            poll_interval: 1,
            json: false,
        })
        .unwrap();
        assert_eq!(code, exit_codes::SUCCESS);
    }
}
