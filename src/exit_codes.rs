//! Exit code constants for the filegate CLI.
//!
//! Every failure condition maps to a distinct code so batch schedulers and
//! shell scripts can branch on the result:
//! - 0: Success (file unlocked / operation performed)
//! - 1: User error (bad args, invalid pattern, non-file probe target)
//! - 2: Path not found
//! - 3: Permission denied while querying lock state
//! - 4: File locked (probe reported locked, or the poll deadline expired)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid glob or regex pattern, or a probe
/// target that is not a regular file.
pub const USER_ERROR: i32 = 1;

/// The given path does not refer to an existing file.
pub const NOT_FOUND: i32 = 2;

/// The calling user is denied access to query the file's lock state.
pub const PERMISSION_DENIED: i32 = 3;

/// The file is (still) open for writing by another actor. Used both for a
/// single `probe` that reports locked and for a `poll` that timed out.
pub const FILE_LOCKED: i32 = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [SUCCESS, USER_ERROR, NOT_FOUND, PERMISSION_DENIED, FILE_LOCKED];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }

    #[test]
    fn success_is_zero() {
        assert_eq!(SUCCESS, 0);
    }

    #[test]
    fn exit_codes_fit_in_a_process_status_byte() {
        for code in [SUCCESS, USER_ERROR, NOT_FOUND, PERMISSION_DENIED, FILE_LOCKED] {
            assert!((0..=255).contains(&code));
        }
    }
}
