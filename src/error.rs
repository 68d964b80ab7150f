//! Error types for the filegate CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.

use crate::exit_codes;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Main error type for filegate operations.
///
/// The taxonomy is deliberately small: `NotFound` and `PermissionDenied`
/// surface probe failures that must never be mistaken for a locked file,
/// `FileLocked` reports a guard that gave up waiting, and `UserError`
/// covers bad arguments and unexpected I/O failures.
#[derive(Error, Debug)]
pub enum FilegateError {
    /// The path does not refer to an existing file.
    #[error("file not found: '{}'", .0.display())]
    NotFound(PathBuf),

    /// The calling user may not query the file's lock state. This is
    /// surfaced as-is, never silently downgraded to "locked".
    #[error("permission denied: '{}'", .0.display())]
    PermissionDenied(PathBuf),

    /// The file was still open for writing when the wait budget ran out.
    /// No move/copy has been performed.
    #[error("file '{}' is open for writing by another process (gave up after {} seconds)",
        .path.display(), .waited.as_secs())]
    FileLocked { path: PathBuf, waited: Duration },

    /// User provided invalid arguments, or an I/O operation failed in a
    /// way that is not part of the lock-state taxonomy.
    #[error("{0}")]
    UserError(String),
}

impl FilegateError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            FilegateError::NotFound(_) => exit_codes::NOT_FOUND,
            FilegateError::PermissionDenied(_) => exit_codes::PERMISSION_DENIED,
            FilegateError::FileLocked { .. } => exit_codes::FILE_LOCKED,
            FilegateError::UserError(_) => exit_codes::USER_ERROR,
        }
    }

    /// Classify an I/O error raised while inspecting `path`.
    ///
    /// `NotFound` and `PermissionDenied` keep their identity; anything else
    /// becomes a `UserError` carrying the path and the OS message.
    pub(crate) fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => FilegateError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => {
                FilegateError::PermissionDenied(path.to_path_buf())
            }
            _ => FilegateError::UserError(format!("'{}': {}", path.display(), err)),
        }
    }
}

/// Result type alias for filegate operations.
pub type Result<T> = std::result::Result<T, FilegateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_error_has_correct_exit_code() {
        let err = FilegateError::NotFound(PathBuf::from("/tmp/missing.csv"));
        assert_eq!(err.exit_code(), exit_codes::NOT_FOUND);
    }

    #[test]
    fn permission_denied_error_has_correct_exit_code() {
        let err = FilegateError::PermissionDenied(PathBuf::from("/root/secret.dat"));
        assert_eq!(err.exit_code(), exit_codes::PERMISSION_DENIED);
    }

    #[test]
    fn file_locked_error_has_correct_exit_code() {
        let err = FilegateError::FileLocked {
            path: PathBuf::from("report.xlsx"),
            waited: Duration::from_secs(10),
        };
        assert_eq!(err.exit_code(), exit_codes::FILE_LOCKED);
    }

    #[test]
    fn user_error_has_correct_exit_code() {
        let err = FilegateError::UserError("bad argument".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn error_messages_name_the_path() {
        let err = FilegateError::NotFound(PathBuf::from("outbound/834.edi"));
        assert!(err.to_string().contains("outbound/834.edi"));

        let err = FilegateError::FileLocked {
            path: PathBuf::from("outbound/834.edi"),
            waited: Duration::from_secs(10),
        };
        let msg = err.to_string();
        assert!(msg.contains("outbound/834.edi"));
        assert!(msg.contains("10 seconds"));
    }

    #[test]
    fn from_io_maps_not_found() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "no such file");
        let err = FilegateError::from_io(Path::new("a.txt"), io_err);
        assert!(matches!(err, FilegateError::NotFound(_)));
    }

    #[test]
    fn from_io_maps_permission_denied() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = FilegateError::from_io(Path::new("a.txt"), io_err);
        assert!(matches!(err, FilegateError::PermissionDenied(_)));
    }

    #[test]
    fn from_io_wraps_other_kinds_as_user_error() {
        let io_err = io::Error::new(io::ErrorKind::Other, "disk on fire");
        let err = FilegateError::from_io(Path::new("a.txt"), io_err);
        assert!(matches!(err, FilegateError::UserError(_)));
        assert!(err.to_string().contains("a.txt"));
    }
}
