//! # ejournal core
//!
//! Core library for ejournal, an encrypted personal journal stored as one
//! encrypted file per entry plus an encrypted index.
//!
//! This crate provides key derivation, blob encryption, the on-disk storage
//! engine, and workflows written against the storage trait, independent of
//! the CLI interface.
//!
//! ## Architecture
//!
//! - **crypto**: scrypt key derivation and AES-GCM sealing
//! - **storage**: the `JournalStore` trait, the file-backed driver and its
//!   blob codec, index and recovery
//! - **workflows**: listing, recent entries, rekey transfer and import
//! - **config**: the parameters a journal is opened with
//!
//! ## On-disk layout
//!
//! ```text
//! ~/ejournal/
//!   index.cpt       encrypted {timestamp: id} map
//!   <id>.cpt        one encrypted entry per file
//! ```

pub mod config;
pub mod crypto;
pub mod error;
pub mod fs;
pub mod paths;
pub mod storage;
pub mod workflows;

pub use config::StoreConfig;
pub use error::{JournalError, Result};
pub use storage::{Entry, FileJournal, InMemoryJournal, Index, JournalStore};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
