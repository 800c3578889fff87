//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Resource not found (config, journal, entry).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Authentication failed (wrong password or tampered data).
    pub const AUTH_FAILED: i32 = 5;

    /// Index recovery could not complete.
    pub const RECOVERY_FAILED: i32 = 6;
}

/// Environment variable holding the journal password.
pub const PASSWORD_ENV: &str = "EJOURNAL_PASSWORD";

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "EJOURNAL_LOG";
