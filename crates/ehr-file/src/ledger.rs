//! Filesystem storage for a single-node world state.
//!
//! ## Directory Structure
//!
//! ```text
//! $ROOT/
//! ├── world-state.json
//! └── world-state.lock
//! ```
//!
//! `world-state.json` maps each key to its value as a JSON object, so values
//! must be UTF-8. Writers hold an exclusive lock on `world-state.lock` for
//! the whole read-modify-write cycle and replace the state file by rename,
//! so readers never observe a half-written file and a failed write leaves
//! the previous state in place.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fs2::FileExt;
use tracing::{debug, instrument};

use ehr_core::error::{Error, LedgerError};
use ehr_core::traits::{KeyValue, Ledger, ScanPage, SnapshotScan, snapshot};
use ehr_core::types::{Bookmark, PageSize, Query};
use ehr_core::{Result, WorldState};

fn map_io(err: std::io::Error) -> Error {
    Error::Ledger(LedgerError::Io(err))
}

/// The state file holds values as JSON strings.
fn check_storable(key: &str, value: &[u8]) -> Result<()> {
    std::str::from_utf8(value).map_err(|e| LedgerError::Rejected {
        key: key.to_string(),
        reason: format!("value is not UTF-8: {}", e),
    })?;
    Ok(())
}

/// A ledger persisted in a directory.
///
/// Every operation reloads the world state from disk, so several processes
/// may share one directory.
#[derive(Debug, Clone)]
pub struct FileLedger {
    root: PathBuf,
}

impl FileLedger {
    /// Create a file ledger rooted at the given directory.
    ///
    /// The directory is created on first write.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Get the root directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the world state file path.
    pub(crate) fn state_path(&self) -> PathBuf {
        self.root.join("world-state.json")
    }

    fn lock_path(&self) -> PathBuf {
        self.root.join("world-state.lock")
    }

    fn open_lock(&self) -> Result<File> {
        fs::create_dir_all(&self.root).map_err(map_io)?;

        OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())
            .map_err(map_io)
    }

    /// Run `f` against the world state under a shared lock.
    fn read_state<T>(&self, f: impl FnOnce(&WorldState) -> T) -> Result<T> {
        if !self.state_path().exists() {
            return Ok(f(&WorldState::new()));
        }

        let lock_file = self.open_lock()?;
        lock_file.lock_shared().map_err(map_io)?;

        let result = self.load().map(|state| f(&state));

        lock_file.unlock().map_err(map_io)?;
        result
    }

    /// Run `f` against the world state under an exclusive lock and persist
    /// the result.
    ///
    /// The lock is held from load to rename, so `f` sees no concurrent
    /// writer.
    fn update_state<T>(&self, f: impl FnOnce(&mut WorldState) -> T) -> Result<T> {
        let lock_file = self.open_lock()?;
        lock_file.lock_exclusive().map_err(map_io)?;

        let result = self.load().and_then(|mut state| {
            let output = f(&mut state);
            self.save(&state)?;
            Ok(output)
        });

        lock_file.unlock().map_err(map_io)?;
        result
    }

    fn load(&self) -> Result<WorldState> {
        let path = self.state_path();

        if !path.exists() {
            return Ok(WorldState::new());
        }

        let content = fs::read(&path).map_err(map_io)?;
        let state = serde_json::from_slice(&content).map_err(|e| LedgerError::Corrupt {
            message: format!("{}: {}", path.display(), e),
        })?;

        Ok(state)
    }

    fn save(&self, state: &WorldState) -> Result<()> {
        let path = self.state_path();

        let content = serde_json::to_vec_pretty(state).map_err(|e| LedgerError::Corrupt {
            message: e.to_string(),
        })?;

        let temp_path = path.with_extension("tmp");
        let mut file = File::create(&temp_path).map_err(map_io)?;
        file.write_all(&content).map_err(map_io)?;
        file.sync_all().map_err(map_io)?;
        fs::rename(&temp_path, &path).map_err(map_io)?;

        Ok(())
    }
}

#[async_trait]
impl Ledger for FileLedger {
    type Scan = SnapshotScan;

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.read_state(|state| state.get(key).map(<[u8]>::to_vec))
    }

    #[instrument(skip(self, value), fields(root = %self.root.display(), len = value.len()))]
    async fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        check_storable(key, value)?;
        self.update_state(|state| state.put(key, value))?;
        debug!("Wrote world state");
        Ok(())
    }

    #[instrument(skip_all, fields(root = %self.root.display(), rows = rows.len()))]
    async fn insert_absent(&self, rows: Vec<KeyValue>) -> Result<Vec<bool>> {
        for row in &rows {
            check_storable(&row.key, &row.value)?;
        }

        let written = self.update_state(|state| state.insert_absent(rows))?;
        debug!(written = written.iter().filter(|w| **w).count(), "Wrote world state");
        Ok(written)
    }

    async fn scan(&self, start: &str, end: &str) -> Result<Self::Scan> {
        let rows = self.read_state(|state| state.scan(start, end))?;
        Ok(snapshot(rows))
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    async fn scan_page(
        &self,
        query: &Query,
        page_size: PageSize,
        bookmark: &Bookmark,
    ) -> Result<ScanPage<Self::Scan>> {
        let (rows, bookmark) =
            self.read_state(|state| state.scan_page(query, page_size, bookmark))?;
        debug!(rows = rows.len(), "Scanned page");

        Ok(ScanPage {
            rows: snapshot(rows),
            bookmark,
        })
    }
}
