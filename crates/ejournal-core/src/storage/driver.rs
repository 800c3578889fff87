//! File-backed journal store.
//!
//! `FileJournal` composes the key, the entry blobs and the index blob, and
//! owns the lock that serializes index access. The key is derived once when
//! the journal is loaded and lives as long as the value.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::entries::{validate_id, EntryStore};
use super::index::{IndexStore, INDEX_FILE, LEGACY_INDEX_MARKER};
use super::recovery::{recover_index, RecoveryOutcome, DEFAULT_RECOVERY_DEADLINE};
use super::traits::JournalStore;
use super::types::{Entry, Index};
use crate::config::StoreConfig;
use crate::crypto::{derive_key, DerivedKey};
use crate::error::{JournalError, Result};
use crate::fs::ensure_private_dir;
use crate::paths::expand_home;

/// What was on disk for an id just before it was overwritten.
enum PreviousBlob {
    Missing,
    Dated(DateTime<Utc>),
    Undated,
}

/// Encrypted journal stored as one blob per entry plus an index blob.
///
/// A single `FileJournal` may be shared between threads. `list` takes the
/// index lock shared; `write` and `init` take it exclusively for their whole
/// read-modify-persist cycle.
///
/// Entry blob I/O is outside the lock. Writers of *different* ids never
/// interfere, but two concurrent writers of the *same* id are not serialized:
/// their blob writes race and the index may briefly point at either date.
/// Callers must keep to a single writer per id.
///
/// A crash between the entry blob write and the index write leaves a blob
/// the index does not know about. Removing `index.cpt` and calling `init`
/// rebuilds the index from every blob.
#[derive(Debug)]
pub struct FileJournal {
    directory: PathBuf,
    entries: EntryStore,
    index: IndexStore,
    index_lock: RwLock<()>,
    recovery_deadline: Duration,
}

impl FileJournal {
    /// Derive the key and resolve the storage directory without checking
    /// whether the journal has been initialized.
    ///
    /// # Errors
    ///
    /// - `KeyDerivation` if the salt or work factor is malformed
    /// - `InvalidInput` if `~` cannot be expanded
    pub fn load(config: &StoreConfig, password: &str) -> Result<Self> {
        let salt = config.salt_bytes()?;
        let key = derive_key(password, &salt, config.work_factor)?;
        let directory = expand_home(&config.storage_directory)?;
        Ok(Self::with_key(directory, key))
    }

    /// Load the journal and require it to be initialized.
    ///
    /// # Errors
    ///
    /// Returns `JournalError::NeedsInit` when neither the index nor the legacy
    /// marker exists. This is the signal to call [`JournalStore::init`] on a
    /// journal obtained from [`FileJournal::load`]; it is not logged as an
    /// error. Any other error is genuine.
    pub fn open(config: &StoreConfig, password: &str) -> Result<Self> {
        let journal = Self::load(config, password)?;
        journal.ensure_initialized()?;
        Ok(journal)
    }

    /// Build a journal over an absolute directory with an already derived key.
    pub fn with_key(directory: impl Into<PathBuf>, key: DerivedKey) -> Self {
        let directory = directory.into();
        let key = Arc::new(key);
        Self {
            entries: EntryStore::new(directory.clone(), Arc::clone(&key)),
            index: IndexStore::new(&directory, key),
            directory,
            index_lock: RwLock::new(()),
            recovery_deadline: DEFAULT_RECOVERY_DEADLINE,
        }
    }

    /// Override the wall-clock budget for index recovery during `init`.
    pub fn with_recovery_deadline(mut self, deadline: Duration) -> Self {
        self.recovery_deadline = deadline;
        self
    }

    /// The expanded storage directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Check for the index or the legacy marker.
    pub fn ensure_initialized(&self) -> Result<()> {
        if self.directory.join(INDEX_FILE).try_exists()?
            || self.directory.join(LEGACY_INDEX_MARKER).try_exists()?
        {
            return Ok(());
        }
        debug!(directory = %self.directory.display(), "Journal is not initialized");
        Err(needs_init())
    }

    fn read_lock(&self) -> Result<RwLockReadGuard<'_, ()>> {
        self.index_lock
            .read()
            .map_err(|_| JournalError::Storage("Index lock poisoned".to_string()))
    }

    fn write_lock(&self) -> Result<RwLockWriteGuard<'_, ()>> {
        self.index_lock
            .write()
            .map_err(|_| JournalError::Storage("Index lock poisoned".to_string()))
    }

    /// Read the index; the caller must hold the index lock.
    fn read_index(&self) -> Result<Index> {
        match self.index.read() {
            Err(JournalError::Io { source }) if source.kind() == io::ErrorKind::NotFound => {
                Err(needs_init())
            }
            other => other,
        }
    }

    /// Look up the blob `id` is about to replace.
    ///
    /// A blob that decrypts but cannot be decoded is tolerated. One that
    /// fails authentication is not: it was sealed under another key, or
    /// tampered with, and must not be overwritten.
    fn previous_blob(&self, id: &str) -> Result<PreviousBlob> {
        if !self.entries.exists(id) {
            return Ok(PreviousBlob::Missing);
        }
        match self.entries.read(id) {
            Ok(Entry { date: Some(date), .. }) => Ok(PreviousBlob::Dated(date)),
            Ok(_) => Ok(PreviousBlob::Undated),
            Err(JournalError::AuthenticationFailure) => Err(JournalError::AuthenticationFailure),
            Err(err) => {
                warn!(id, error = %err, "Failed to read previous entry");
                Ok(PreviousBlob::Undated)
            }
        }
    }

    fn rebuild_index(&self) -> Result<Index> {
        let blobs = self.entries.blob_paths()?;
        if blobs.is_empty() {
            return Ok(Index::new());
        }

        info!(
            blobs = blobs.len(),
            directory = %self.directory.display(),
            "Rebuilding index from existing entries"
        );
        let entries = self.entries.clone();
        match recover_index(blobs, self.recovery_deadline, move |path| {
            entries.recover_mapping(path)
        }) {
            RecoveryOutcome::Recovered(index) => Ok(index),
            RecoveryOutcome::PartialFailure(failures) => {
                Err(JournalError::RecoveryPartialFailure { failures })
            }
            RecoveryOutcome::TimedOut { completed, total } => Err(JournalError::RecoveryTimeout {
                completed,
                total,
                deadline: self.recovery_deadline,
            }),
        }
    }
}

fn needs_init() -> JournalError {
    JournalError::NeedsInit {
        reason: "the index doesn't exist".to_string(),
    }
}

impl JournalStore for FileJournal {
    fn write(&self, mut entry: Entry) -> Result<()> {
        if entry.id.is_empty() {
            entry.id = Uuid::new_v4().to_string();
        }
        validate_id(&entry.id)?;
        let date = *entry.date.get_or_insert_with(Utc::now);

        // Nothing is persisted until the key has opened the index.
        {
            let _guard = self.read_lock()?;
            self.read_index()?;
        }
        let previous = self.previous_blob(&entry.id)?;
        self.entries.write(&entry)?;

        let _guard = self.write_lock()?;
        let mut index = self.read_index()?;
        match previous {
            PreviousBlob::Dated(old) if index.get(&old) == Some(&entry.id) => {
                index.remove(&old);
            }
            _ => index.retain(|_, id| *id != entry.id),
        }
        index.insert(date, entry.id.clone());
        self.index.write(&index)?;

        debug!(id = %entry.id, %date, "Wrote entry");
        Ok(())
    }

    fn read(&self, id: &str) -> Result<Entry> {
        self.entries.read(id)
    }

    fn list(&self) -> Result<Index> {
        let _guard = self.read_lock()?;
        self.read_index()
    }

    fn init(&self) -> Result<()> {
        let _guard = self.write_lock()?;
        ensure_private_dir(&self.directory)?;

        let index = self.rebuild_index()?;
        self.index.write(&index)?;

        info!(
            entries = index.len(),
            directory = %self.directory.display(),
            "Initialized journal"
        );
        Ok(())
    }
}
