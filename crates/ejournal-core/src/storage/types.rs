//! Core data types for the storage layer.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Mapping from entry timestamp to entry id, ordered oldest first.
///
/// Holds at most one mapping per id.
pub type Index = BTreeMap<DateTime<Utc>, String>;

/// A single journal entry.
///
/// Reading tolerates absent fields, `null` tags, and the capitalised field
/// names written by older generations of the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Identifies the entry's blob on disk; generated on write when empty
    #[serde(default, alias = "Id")]
    pub id: String,

    /// When the entry was written; defaults to now on write
    #[serde(default, alias = "Date", skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,

    /// Free-form text
    #[serde(default, alias = "Body")]
    pub body: String,

    /// Ordered tags
    #[serde(default, alias = "Tags", deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
}

impl Entry {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
