//! In-memory ledger.
//!
//! [`WorldState`] holds the sorted key space and implements the scan rules
//! shared by the bundled ledgers. [`MemoryLedger`] puts it behind a lock so
//! it can serve a [`RecordStore`](crate::RecordStore) directly.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{instrument, trace};

use crate::Result;
use crate::error::LedgerError;
use crate::traits::{KeyValue, Ledger, ScanPage, SnapshotScan, snapshot};
use crate::types::{Bookmark, PageSize, Query};

/// A sorted key-value world state.
///
/// Bookmarks produced by [`WorldState::scan_page`] are the last key of the
/// page they close; the next page starts strictly after it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorldState {
    entries: BTreeMap<String, Vec<u8>>,
}

impl WorldState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn put(&mut self, key: &str, value: &[u8]) {
        self.entries.insert(key.to_string(), value.to_vec());
    }

    /// Whether a non-empty value is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some_and(|value| !value.is_empty())
    }

    /// Store each row whose key is free, reporting which ones were stored.
    pub fn insert_absent(&mut self, rows: Vec<KeyValue>) -> Vec<bool> {
        rows.into_iter()
            .map(|row| {
                if self.contains(&row.key) {
                    return false;
                }
                self.entries.insert(row.key, row.value);
                true
            })
            .collect()
    }

    /// Rows in `[start, end)`; empty bounds are open.
    pub fn scan(&self, start: &str, end: &str) -> Vec<KeyValue> {
        let lower = if start.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Included(start)
        };

        self.rows_from(lower, end)
            .map(|(key, value)| KeyValue::new(key.as_str(), value.as_slice()))
            .collect()
    }

    /// At most `page_size` rows matching `query`, after `bookmark`.
    pub fn scan_page(
        &self,
        query: &Query,
        page_size: PageSize,
        bookmark: &Bookmark,
    ) -> (Vec<KeyValue>, Bookmark) {
        let start = query.start_key();
        let lower = if !bookmark.is_start() && bookmark.as_str() >= start {
            Bound::Excluded(bookmark.as_str())
        } else if start.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Included(start)
        };

        let rows: Vec<KeyValue> = self
            .rows_from(lower, query.end_key())
            .filter(|(key, value)| query.matches(key, value))
            .take(page_size.as_usize())
            .map(|(key, value)| KeyValue::new(key.as_str(), value.as_slice()))
            .collect();

        let next = match rows.last() {
            Some(last) => Bookmark::new(last.key.clone()),
            None => bookmark.clone(),
        };

        (rows, next)
    }

    fn rows_from<'a>(
        &'a self,
        lower: Bound<&'a str>,
        end: &'a str,
    ) -> impl Iterator<Item = (&'a String, &'a Vec<u8>)> + 'a {
        self.entries
            .range::<str, _>((lower, Bound::Unbounded))
            .take_while(move |(key, _)| end.is_empty() || key.as_str() < end)
    }
}

// Persisted as a JSON object of key -> UTF-8 value.
impl Serialize for WorldState {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::{Error as _, SerializeMap};

        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            let text = std::str::from_utf8(value)
                .map_err(|e| S::Error::custom(format!("value under '{}': {}", key, e)))?;
            map.serialize_entry(key, text)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for WorldState {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
        Ok(Self {
            entries: raw
                .into_iter()
                .map(|(key, value)| (key, value.into_bytes()))
                .collect(),
        })
    }
}

/// A ledger held entirely in process memory.
///
/// Clones share the same world state.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    state: Arc<RwLock<WorldState>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current world state.
    pub fn snapshot_state(&self) -> Result<WorldState> {
        let state = self.state.read().map_err(|_| LedgerError::Poisoned)?;
        Ok(state.clone())
    }
}

impl From<WorldState> for MemoryLedger {
    fn from(state: WorldState) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    type Scan = SnapshotScan;

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let state = self.state.read().map_err(|_| LedgerError::Poisoned)?;
        Ok(state.get(key).map(<[u8]>::to_vec))
    }

    #[instrument(skip(self, value), fields(len = value.len()))]
    async fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut state = self.state.write().map_err(|_| LedgerError::Poisoned)?;
        state.put(key, value);
        trace!("Put value");
        Ok(())
    }

    #[instrument(skip_all, fields(rows = rows.len()))]
    async fn insert_absent(&self, rows: Vec<KeyValue>) -> Result<Vec<bool>> {
        let mut state = self.state.write().map_err(|_| LedgerError::Poisoned)?;
        let written = state.insert_absent(rows);
        trace!(written = written.iter().filter(|w| **w).count(), "Inserted rows");
        Ok(written)
    }

    async fn scan(&self, start: &str, end: &str) -> Result<Self::Scan> {
        let state = self.state.read().map_err(|_| LedgerError::Poisoned)?;
        Ok(snapshot(state.scan(start, end)))
    }

    async fn scan_page(
        &self,
        query: &Query,
        page_size: PageSize,
        bookmark: &Bookmark,
    ) -> Result<ScanPage<Self::Scan>> {
        let state = self.state.read().map_err(|_| LedgerError::Poisoned)?;
        let (rows, bookmark) = state.scan_page(query, page_size, bookmark);
        Ok(ScanPage {
            rows: snapshot(rows),
            bookmark,
        })
    }
}
