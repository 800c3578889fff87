//! Store-agnostic helpers built on [`JournalStore`].

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::Result;
use crate::storage::{Entry, JournalStore};

/// The index as `(date, id)` pairs, newest first.
pub fn listing<S: JournalStore + ?Sized>(store: &S) -> Result<Vec<(DateTime<Utc>, String)>> {
    Ok(store.list()?.into_iter().rev().collect())
}

/// Read the newest `count` entries, newest first. A `count` of 0 reads all.
pub fn recent_entries<S: JournalStore + ?Sized>(store: &S, count: usize) -> Result<Vec<Entry>> {
    let listing = listing(store)?;
    let take = if count == 0 { listing.len() } else { count };
    listing
        .into_iter()
        .take(take)
        .map(|(_, id)| store.read(&id))
        .collect()
}

/// Copy every listed entry from `from` into `to`.
///
/// Used by rekey: `to` is a freshly initialized store with a new salt or
/// password. Stops at the first entry that cannot be read or written.
/// Returns the number of entries copied.
pub fn transfer_entries<A, B>(from: &A, to: &B) -> Result<usize>
where
    A: JournalStore + ?Sized,
    B: JournalStore + ?Sized,
{
    let index = from.list()?;
    for id in index.values() {
        to.write(from.read(id)?)?;
    }
    info!(entries = index.len(), "Transferred entries");
    Ok(index.len())
}

/// Write one entry given as JSON and return its id.
///
/// Accepts both current and capitalized field names. An empty id is
/// replaced with a generated one before writing so the caller learns it.
pub fn import_json<S: JournalStore + ?Sized>(store: &S, json: &[u8]) -> Result<String> {
    let mut entry: Entry = serde_json::from_slice(json)?;
    if entry.id.is_empty() {
        entry.id = uuid::Uuid::new_v4().to_string();
    }
    let id = entry.id.clone();
    store.write(entry)?;
    Ok(id)
}
