//! CLI error reporting and exit codes.

use ejournal_core::JournalError;

use crate::constants::exit_codes;

/// A user-facing error with a dedicated exit code.
#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(exit_codes::NOT_FOUND, message)
    }

    pub fn auth_failed(message: impl Into<String>) -> Self {
        Self::new(exit_codes::AUTH_FAILED, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(exit_codes::INVALID_INPUT, message)
    }

    /// Classify a core error, if it has a dedicated exit code.
    pub fn from_journal(err: &JournalError) -> Option<Self> {
        let cli_error = match err {
            JournalError::NeedsInit { .. } => Self::not_found("The journal is not initialized.")
                .with_hint("Run:\n  ejournal init"),
            JournalError::AuthenticationFailure => Self::auth_failed("Incorrect password.")
                .with_hint("Hint: the password cannot be recovered; entries are unreadable without it."),
            JournalError::EntryNotFound(id) => Self::not_found(format!("Entry not found: {}", id)),
            JournalError::InvalidInput(message) => Self::invalid_input(message.clone()),
            JournalError::RecoveryTimeout { .. } | JournalError::RecoveryPartialFailure { .. } => {
                Self::new(exit_codes::RECOVERY_FAILED, err.to_string())
                    .with_hint("No index was written. Fix or move the listed files and run `ejournal init` again.")
            }
            _ => return None,
        };
        Some(cli_error)
    }

    /// The exit code for any error surfaced from a command.
    pub fn classify(err: &anyhow::Error) -> Option<Self> {
        if let Some(cli_error) = err.downcast_ref::<CliError>() {
            return Some(Self {
                code: cli_error.code,
                message: cli_error.message.clone(),
                hint: cli_error.hint.clone(),
            });
        }
        err.downcast_ref::<JournalError>().and_then(Self::from_journal)
    }

    pub fn exit(self) -> ! {
        eprintln!("Error: {}", self.message);
        if let Some(hint) = self.hint {
            eprintln!("{}", hint);
        }
        std::process::exit(self.code);
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}
