//! Per-entry encrypted blobs.
//!
//! Each entry lives in `{id}.cpt` inside the storage directory. Blob writes
//! are atomic per file but not coordinated across writers: two concurrent
//! writers of the same id race, and the last rename wins.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::crypto::DerivedKey;
use crate::error::{JournalError, Result};
use crate::fs::write_atomic;
use crate::storage::codec;
use crate::storage::index::INDEX_FILE;
use crate::storage::types::Entry;

/// File extension shared by entry and index blobs.
pub const BLOB_EXTENSION: &str = "cpt";

/// Id that would collide with the index blob.
const RESERVED_ID: &str = "index";

/// Reads and writes entry blobs in one storage directory.
#[derive(Debug, Clone)]
pub struct EntryStore {
    directory: PathBuf,
    key: Arc<DerivedKey>,
}

impl EntryStore {
    pub fn new(directory: impl Into<PathBuf>, key: Arc<DerivedKey>) -> Self {
        Self {
            directory: directory.into(),
            key,
        }
    }

    /// Path of the blob for `id`.
    pub fn blob_path(&self, id: &str) -> PathBuf {
        self.directory.join(format!("{}.{}", id, BLOB_EXTENSION))
    }

    pub fn exists(&self, id: &str) -> bool {
        self.blob_path(id).is_file()
    }

    /// Decrypt and parse the entry stored under `id`.
    ///
    /// # Errors
    ///
    /// - `EntryNotFound` if no blob exists for `id`
    /// - `AuthenticationFailure` / `Format` from the decode chain
    pub fn read(&self, id: &str) -> Result<Entry> {
        validate_id(id)?;
        match read_blob(&self.blob_path(id), &self.key) {
            Err(JournalError::Io { source }) if source.kind() == io::ErrorKind::NotFound => {
                Err(JournalError::EntryNotFound(id.to_string()))
            }
            other => other,
        }
    }

    /// Encode and persist `entry`, replacing any previous blob for its id.
    pub fn write(&self, entry: &Entry) -> Result<()> {
        validate_id(&entry.id)?;
        let plaintext = serde_json::to_vec(entry)?;
        let blob = codec::encode(&plaintext, &self.key)?;
        write_atomic(&self.blob_path(&entry.id), &blob)?;
        debug!(id = %entry.id, bytes = blob.len(), "Wrote entry blob");
        Ok(())
    }

    /// Every entry blob in the directory, sorted by file name.
    ///
    /// The index blob and in-flight temp files are skipped.
    pub fn blob_paths(&self) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for dir_entry in fs::read_dir(&self.directory)? {
            let dir_entry = dir_entry?;
            if !dir_entry.file_type()?.is_file() {
                continue;
            }
            let path = dir_entry.path();
            let is_blob = path.extension().and_then(|ext| ext.to_str()) == Some(BLOB_EXTENSION);
            let name = dir_entry.file_name();
            let name = name.to_string_lossy();
            if is_blob && name != INDEX_FILE && !name.starts_with('.') {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    /// The index mapping a blob contributes during recovery.
    ///
    /// The file stem is authoritative for the id, since that is how `read`
    /// locates the blob. An entry without a date takes the blob's
    /// modification time.
    pub fn recover_mapping(&self, path: &Path) -> Result<(DateTime<Utc>, String)> {
        let entry = read_blob(path, &self.key)?;
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| JournalError::InvalidInput(format!("Invalid blob name {}", path.display())))?
            .to_string();

        if !entry.id.is_empty() && entry.id != stem {
            warn!(path = %path.display(), embedded = %entry.id, "Entry id does not match its file name");
        }

        let date = match entry.date {
            Some(date) => date,
            None => DateTime::<Utc>::from(fs::metadata(path)?.modified()?),
        };

        Ok((date, stem))
    }
}

/// Decrypt, decode and parse one entry blob.
pub fn read_blob(path: &Path, key: &DerivedKey) -> Result<Entry> {
    let blob = fs::read(path)?;
    let plaintext = codec::decode(&blob, key)?;
    Ok(serde_json::from_slice(&plaintext)?)
}

/// Check that `id` can be used as a blob file name.
pub fn validate_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(JournalError::InvalidInput(
            "Entry id cannot be empty".to_string(),
        ));
    }
    if id.starts_with('.') {
        return Err(JournalError::InvalidInput(format!(
            "Entry id cannot start with '.': {}",
            id
        )));
    }
    if id.contains(['/', '\\', '\0']) {
        return Err(JournalError::InvalidInput(format!(
            "Entry id cannot contain path separators: {}",
            id
        )));
    }
    if id == RESERVED_ID {
        return Err(JournalError::InvalidInput(format!(
            "Entry id '{}' is reserved",
            RESERVED_ID
        )));
    }
    Ok(())
}
