//! CLI argument parsing for filegate.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Filegate: file availability gate and guarded file operations.
///
/// Checks whether a file is open for writing by another process, waits
/// for it to become free, and moves or copies files only once they are.
/// Built for batch pipelines where a scheduler hands files between steps
/// and a step must never act on a half-written file.
#[derive(Parser, Debug)]
#[command(name = "filegate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for filegate.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check once whether a file is open for writing.
    ///
    /// Prints `unlocked` or `locked`. Exits 0 when unlocked, 4 when
    /// locked, so scripts can branch on the status directly.
    Probe(ProbeArgs),

    /// Wait for a file to become free, probing on a fixed interval.
    ///
    /// Prints `unlocked` or `timed_out`. Exits 0 when the file freed up
    /// before the deadline, 4 on timeout.
    Poll(PollArgs),

    /// Move a file once it is free.
    ///
    /// Waits up to the guard budget (default 10 seconds, probing every
    /// second), then moves. Fails with exit 4 and performs no move when
    /// the file stays locked.
    Move(MoveArgs),

    /// Copy a file or directory tree once the source is free.
    ///
    /// Same guard as `move`. Directory trees require --recursive; the
    /// include/exclude filters are applied per file name.
    Copy(CopyArgs),

    /// Report whether a file's size is exactly zero bytes.
    ///
    /// Prints `true` or `false`.
    IsEmpty(IsEmptyArgs),

    /// Print a message with the standard timestamp prefix.
    ///
    /// Lets shell steps interleave their own lines with filegate's.
    Log(LogArgs),

    /// Copy pattern-matched files between folders and wait for them to
    /// appear downstream.
    ///
    /// Scans the source folder for names matching a case-insensitive
    /// regex, copies them to the destination folder, then polls a third
    /// folder until files with the same names (or the same first capture
    /// group) appear there. Exit codes for success and timeout are
    /// overridable for scheduler integration.
    Transfer(TransferArgs),
}

/// Arguments for the `probe` command.
#[derive(Parser, Debug)]
pub struct ProbeArgs {
    /// File to check.
    pub path: PathBuf,

    /// Print a JSON report instead of the bare status.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `poll` command.
#[derive(Parser, Debug)]
pub struct PollArgs {
    /// File to wait for.
    pub path: PathBuf,

    /// Give up after this many seconds. Zero means a single probe.
    #[arg(long)]
    pub timeout: u64,

    /// Seconds between probes.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_interval: u64,

    /// Print a JSON report instead of the bare outcome.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `move` command.
#[derive(Parser, Debug)]
pub struct MoveArgs {
    /// File to move.
    pub source: PathBuf,

    /// Where to move it to.
    pub destination: PathBuf,

    /// Overwrite an existing destination.
    #[arg(long)]
    pub force: bool,

    /// Only act when the source name matches one of these globs.
    #[arg(long, value_delimiter = ',')]
    pub include: Vec<String>,

    /// Never act when the source name matches one of these globs.
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Seconds to wait for the source to become free.
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Seconds between probes while waiting.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_interval: u64,
}

/// Arguments for the `copy` command.
#[derive(Parser, Debug)]
pub struct CopyArgs {
    /// File or directory to copy.
    pub source: PathBuf,

    /// Where to copy it to.
    pub destination: PathBuf,

    /// Overwrite existing destination files.
    #[arg(long)]
    pub force: bool,

    /// Descend into a directory source.
    #[arg(long, short = 'r')]
    pub recursive: bool,

    /// Only copy files whose name matches one of these globs.
    #[arg(long, value_delimiter = ',')]
    pub include: Vec<String>,

    /// Never copy files whose name matches one of these globs.
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Seconds to wait for the source to become free.
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Seconds between probes while waiting.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_interval: u64,
}

/// Arguments for the `is-empty` command.
#[derive(Parser, Debug)]
pub struct IsEmptyArgs {
    /// File to inspect.
    pub path: PathBuf,
}

/// Arguments for the `log` command.
#[derive(Parser, Debug)]
pub struct LogArgs {
    /// Message to print.
    pub message: String,
}

/// Arguments for the `transfer` command.
#[derive(Parser, Debug)]
pub struct TransferArgs {
    /// Folder to pick files up from.
    #[arg(long)]
    pub source_dir: PathBuf,

    /// Folder to copy the files into.
    #[arg(long)]
    pub destination_dir: PathBuf,

    /// Folder to watch for the files to appear in.
    #[arg(long)]
    pub poll_dir: PathBuf,

    /// Case-insensitive regex matched against file names. A first
    /// capture group, when present, is the comparison key between
    /// source and poll folder.
    #[arg(long)]
    pub pattern: String,

    /// Give up after this many seconds.
    #[arg(long, default_value_t = 300)]
    pub timeout: u64,

    /// Seconds between poll-folder scans.
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_interval: u64,

    /// Exit code to use when the transfer times out.
    #[arg(long, default_value_t = 1)]
    pub timeout_code: u8,

    /// Exit code to use when the transfer completes.
    #[arg(long, default_value_t = 0)]
    pub success_code: u8,

    /// Print a JSON report after the run.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_structure_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn probe_parses_path_and_json_flag() {
        let cli = Cli::try_parse_from(["filegate", "probe", "drop/in.csv", "--json"]).unwrap();
        match cli.command {
            Command::Probe(args) => {
                assert_eq!(args.path, PathBuf::from("drop/in.csv"));
                assert!(args.json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn poll_requires_timeout_and_defaults_interval() {
        let cli =
            Cli::try_parse_from(["filegate", "poll", "in.csv", "--timeout", "30"]).unwrap();
        match cli.command {
            Command::Poll(args) => {
                assert_eq!(args.timeout, 30);
                assert_eq!(args.poll_interval, 1);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        assert!(Cli::try_parse_from(["filegate", "poll", "in.csv"]).is_err());
    }

    #[test]
    fn poll_rejects_zero_interval() {
        let result = Cli::try_parse_from([
            "filegate",
            "poll",
            "in.csv",
            "--timeout",
            "30",
            "--poll-interval",
            "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn move_defaults_match_the_guard_constants() {
        let cli = Cli::try_parse_from(["filegate", "move", "a.csv", "b.csv"]).unwrap();
        match cli.command {
            Command::Move(args) => {
                assert_eq!(args.timeout, 10);
                assert_eq!(args.poll_interval, 1);
                assert!(!args.force);
                assert!(args.include.is_empty());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn copy_accepts_comma_separated_filters() {
        let cli = Cli::try_parse_from([
            "filegate",
            "copy",
            "tree",
            "out",
            "--recursive",
            "--include",
            "*.csv,*.xlsx",
            "--exclude",
            "~$*",
        ])
        .unwrap();
        match cli.command {
            Command::Copy(args) => {
                assert!(args.recursive);
                assert_eq!(args.include, vec!["*.csv", "*.xlsx"]);
                assert_eq!(args.exclude, vec!["~$*"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn transfer_defaults_are_five_minutes_and_five_seconds() {
        let cli = Cli::try_parse_from([
            "filegate",
            "transfer",
            "--source-dir",
            "src",
            "--destination-dir",
            "dst",
            "--poll-dir",
            "poll",
            "--pattern",
            r"batch_\d+",
        ])
        .unwrap();
        match cli.command {
            Command::Transfer(args) => {
                assert_eq!(args.timeout, 300);
                assert_eq!(args.poll_interval, 5);
                assert_eq!(args.timeout_code, 1);
                assert_eq!(args.success_code, 0);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
