//! In-memory journal store.
//!
//! Implements [`JournalStore`] without touching disk or deriving keys, for
//! tests of code that consumes the trait.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use uuid::Uuid;

use super::entries::validate_id;
use super::traits::JournalStore;
use super::types::{Entry, Index};
use crate::error::{JournalError, Result};

#[derive(Debug, Default)]
struct State {
    initialized: bool,
    entries: HashMap<String, Entry>,
    index: Index,
}

/// Journal store held entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryJournal {
    state: RwLock<State>,
}

impl InMemoryJournal {
    /// An uninitialized store; `init` must be called before use.
    pub fn new() -> Self {
        Self::default()
    }

    /// An already initialized, empty store.
    pub fn initialized() -> Self {
        let journal = Self::new();
        if let Ok(mut state) = journal.state.write() {
            state.initialized = true;
        }
        journal
    }

    /// Remove the index while keeping entries, like losing `index.cpt`.
    pub fn drop_index(&self) -> Result<()> {
        let mut state = self.write_state()?;
        state.initialized = false;
        state.index.clear();
        Ok(())
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|_| JournalError::Storage("Journal state poisoned".to_string()))
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|_| JournalError::Storage("Journal state poisoned".to_string()))
    }
}

fn needs_init() -> JournalError {
    JournalError::NeedsInit {
        reason: "the index doesn't exist".to_string(),
    }
}

impl JournalStore for InMemoryJournal {
    fn write(&self, mut entry: Entry) -> Result<()> {
        if entry.id.is_empty() {
            entry.id = Uuid::new_v4().to_string();
        }
        validate_id(&entry.id)?;
        let date = *entry.date.get_or_insert_with(Utc::now);

        let mut state = self.write_state()?;
        if !state.initialized {
            return Err(needs_init());
        }
        state.index.retain(|_, id| *id != entry.id);
        state.index.insert(date, entry.id.clone());
        state.entries.insert(entry.id.clone(), entry);
        Ok(())
    }

    fn read(&self, id: &str) -> Result<Entry> {
        self.read_state()?
            .entries
            .get(id)
            .cloned()
            .ok_or_else(|| JournalError::EntryNotFound(id.to_string()))
    }

    fn list(&self) -> Result<Index> {
        let state = self.read_state()?;
        if !state.initialized {
            return Err(needs_init());
        }
        Ok(state.index.clone())
    }

    fn init(&self) -> Result<()> {
        let mut state = self.write_state()?;
        let rebuilt: Index = state
            .entries
            .values()
            .filter_map(|entry| entry.date.map(|date| (date, entry.id.clone())))
            .collect();
        state.index = rebuilt;
        state.initialized = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_requires_init() {
        let journal = InMemoryJournal::new();

        assert!(journal.list().unwrap_err().is_needs_init());
        assert!(journal.write(Entry::new("x")).unwrap_err().is_needs_init());

        journal.init().unwrap();
        assert!(journal.list().unwrap().is_empty());
    }

    #[test]
    fn test_rewrite_moves_mapping() {
        let journal = InMemoryJournal::initialized();
        let first = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        journal.write(Entry::new("v1").with_id("e").with_date(first)).unwrap();
        journal.write(Entry::new("v2").with_id("e").with_date(second)).unwrap();

        let index = journal.list().unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.get(&second), Some(&"e".to_string()));
        assert_eq!(journal.read("e").unwrap().body, "v2");
    }

    #[test]
    fn test_init_rebuilds_dropped_index() {
        let journal = InMemoryJournal::initialized();
        let day = |d| Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap();
        journal.write(Entry::new("a").with_date(day(1))).unwrap();
        journal.write(Entry::new("b").with_date(day(2))).unwrap();

        journal.drop_index().unwrap();
        assert!(journal.list().unwrap_err().is_needs_init());

        journal.init().unwrap();
        assert_eq!(journal.list().unwrap().len(), 2);
    }
}
