//! Error types for ejournal core operations.
//!
//! This module defines the error hierarchy for all core operations.
//! Errors are descriptive at the core level; the CLI layer maps these
//! to user-facing messages and exit codes.

use std::time::Duration;

use thiserror::Error;

use crate::storage::recovery::RecoveryFailure;

/// Result type alias for ejournal operations.
pub type Result<T> = std::result::Result<T, JournalError>;

/// Core error type for ejournal operations.
#[derive(Debug, Error)]
pub enum JournalError {
    /// The store has no index yet. Not fatal: callers respond by calling `init`.
    #[error("The journal needs to be initialized because {reason}")]
    NeedsInit { reason: String },

    /// AEAD open failed: wrong password, or corrupted/tampered ciphertext
    #[error("Authentication failed (wrong password or corrupted data)")]
    AuthenticationFailure,

    /// Plaintext matched neither the compressed nor the raw JSON encoding
    #[error(
        "Failed to decompress the data because {decompress} and failed to parse the raw data as json because {parse}"
    )]
    Format { decompress: String, parse: String },

    /// Recovery did not finish before its deadline
    #[error("Timed out after {deadline:?} waiting for recovery to finish ({completed} of {total} entries read)")]
    RecoveryTimeout {
        completed: usize,
        total: usize,
        deadline: Duration,
    },

    /// One or more entry blobs could not be read while rebuilding the index
    #[error(
        "Failed to recover {count} entries: {causes}",
        count = .failures.len(),
        causes = join_failures(.failures)
    )]
    RecoveryPartialFailure { failures: Vec<RecoveryFailure> },

    /// Key derivation parameters were malformed
    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    /// No blob exists for the requested entry id
    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    /// Storage backend error (poisoned lock, unreadable index layout)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid caller input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl JournalError {
    /// True for the recoverable "call init first" condition.
    pub fn is_needs_init(&self) -> bool {
        matches!(self, JournalError::NeedsInit { .. })
    }

    /// True when the failure is the wrong-password / tampered-data signal.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, JournalError::AuthenticationFailure)
    }
}

fn join_failures(failures: &[RecoveryFailure]) -> String {
    failures
        .iter()
        .map(|failure| failure.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
