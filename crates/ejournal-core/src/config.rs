//! Journal store configuration.
//!
//! The salt and work factor are fixed when a journal is created. Changing
//! either requires re-encrypting every blob (see
//! [`crate::workflows::transfer_entries`]).

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::{JournalError, Result};

/// Storage directory used when none is configured.
pub const DEFAULT_STORAGE_DIRECTORY: &str = "~/ejournal";

/// Default scrypt work factor (N = 2^19).
pub const DEFAULT_WORK_FACTOR: u8 = 19;

/// Length of generated salts in bytes.
pub const SALT_LENGTH: usize = 64;

/// Parameters needed to open a journal store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding the blobs; may start with `~`
    pub storage_directory: String,

    /// Standard base64 encoded salt
    pub salt: String,

    /// scrypt cost as a power of two
    pub work_factor: u8,
}

impl StoreConfig {
    pub fn new(storage_directory: impl Into<String>, salt: impl Into<String>, work_factor: u8) -> Self {
        Self {
            storage_directory: storage_directory.into(),
            salt: salt.into(),
            work_factor,
        }
    }

    /// A config for a new journal with a fresh random salt and the default
    /// work factor.
    pub fn generate(storage_directory: impl Into<String>) -> Self {
        Self::new(storage_directory, generate_salt(), DEFAULT_WORK_FACTOR)
    }

    pub fn with_work_factor(mut self, work_factor: u8) -> Self {
        self.work_factor = work_factor;
        self
    }

    /// Decode the configured salt.
    ///
    /// # Errors
    ///
    /// Returns `JournalError::KeyDerivation` if the salt is not valid base64.
    pub fn salt_bytes(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(self.salt.trim())
            .map_err(|e| JournalError::KeyDerivation(format!("Failed to decode salt because {}", e)))
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::generate(DEFAULT_STORAGE_DIRECTORY)
    }
}

/// Generate a random base64 encoded salt of [`SALT_LENGTH`] bytes.
pub fn generate_salt() -> String {
    let mut salt = [0u8; SALT_LENGTH];
    OsRng.fill_bytes(&mut salt);
    STANDARD.encode(salt)
}
