//! Journal store trait definition.
//!
//! `JournalStore` is the whole boundary between the storage engine and its
//! callers (CLI commands, import and rekey workflows). Implementations:
//!
//! - [`FileJournal`](super::FileJournal): encrypted blobs on disk
//! - [`InMemoryJournal`](super::InMemoryJournal): in-memory fake for tests

use super::types::{Entry, Index};
use crate::error::Result;

/// Storage interface for an encrypted journal.
///
/// All implementations must ensure:
/// - At most one index mapping exists per entry id
/// - `list` never observes a half-applied `write`
/// - Operations before `init` on an uninitialized store fail with
///   `JournalError::NeedsInit`
pub trait JournalStore: Send + Sync {
    /// Persist an entry, replacing any previous entry with the same id.
    ///
    /// An empty id is replaced by a generated one and a missing date by the
    /// current time.
    ///
    /// # Errors
    ///
    /// Returns `JournalError::InvalidInput` if the id cannot name a blob.
    fn write(&self, entry: Entry) -> Result<()>;

    /// Read one entry by id.
    ///
    /// # Errors
    ///
    /// - `JournalError::EntryNotFound` if no entry has this id
    /// - `JournalError::AuthenticationFailure` on a wrong password or tampered blob
    /// - `JournalError::Format` if the blob decrypts but cannot be decoded
    fn read(&self, id: &str) -> Result<Entry>;

    /// The full timestamp -> id index.
    fn list(&self) -> Result<Index>;

    /// Initialize the store, rebuilding the index from existing entries if any.
    fn init(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_is_object_safe() {
        fn _accepts_dyn_store(_store: &dyn JournalStore) {}
        fn _accepts_boxed_store(_store: Box<dyn JournalStore>) {}
    }
}
