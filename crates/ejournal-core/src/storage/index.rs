//! The encrypted index blob.
//!
//! On disk the index is a JSON object mapping RFC 3339 timestamps to entry
//! ids, encoded like any other blob. Callers hold the driver's index lock
//! around every read-modify-write cycle.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;

use crate::crypto::DerivedKey;
use crate::error::{JournalError, Result};
use crate::fs::write_atomic;
use crate::storage::codec;
use crate::storage::types::Index;

/// File name of the index blob.
pub const INDEX_FILE: &str = "index.cpt";

/// Marker whose presence means an oldest-generation journal was initialized.
/// Checked when opening, never written.
pub const LEGACY_INDEX_MARKER: &str = "index.ejrnl";

/// Reads and writes the index blob.
#[derive(Debug, Clone)]
pub struct IndexStore {
    path: PathBuf,
    key: Arc<DerivedKey>,
}

impl IndexStore {
    pub fn new(directory: &Path, key: Arc<DerivedKey>) -> Self {
        Self {
            path: directory.join(INDEX_FILE),
            key,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Decrypt and parse the index.
    ///
    /// A missing index surfaces as an `Io` error of kind `NotFound`.
    pub fn read(&self) -> Result<Index> {
        let blob = std::fs::read(&self.path)?;
        let plaintext = codec::decode(&blob, &self.key)?;
        let raw: BTreeMap<String, String> = serde_json::from_slice(&plaintext)?;

        raw.into_iter()
            .map(|(timestamp, id)| Ok((parse_timestamp(&timestamp)?, id)))
            .collect()
    }

    /// Encode and atomically replace the index.
    pub fn write(&self, index: &Index) -> Result<()> {
        let raw: BTreeMap<String, &String> = index
            .iter()
            .map(|(date, id)| (format_timestamp(date), id))
            .collect();
        let plaintext = serde_json::to_vec(&raw)?;
        let blob = codec::encode(&plaintext, &self.key)?;
        write_atomic(&self.path, &blob)?;
        debug!(entries = index.len(), "Persisted index");
        Ok(())
    }
}

fn format_timestamp(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|date| date.with_timezone(&Utc))
        .map_err(|e| JournalError::Storage(format!("Invalid index timestamp {}: {}", value, e)))
}
