//! Ledger trait.

use async_trait::async_trait;
use futures_core::Stream;
use futures_util::stream;

use crate::Result;
use crate::types::{Bookmark, PageSize, Query};

/// A key and the raw bytes stored under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Vec<u8>,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Iteration handle over the rows of a range scan.
///
/// The handle is released when it is dropped, whether the caller read it to
/// the end or stopped early on an error.
pub trait RangeScan: Stream<Item = Result<KeyValue>> + Send {}

impl<T> RangeScan for T where T: Stream<Item = Result<KeyValue>> + Send {}

/// Rows of one paged scan and the bookmark to resume after them.
#[derive(Debug)]
pub struct ScanPage<S> {
    pub rows: S,
    pub bookmark: Bookmark,
}

/// Range scan over rows that were already read into memory.
pub type SnapshotScan = stream::Iter<std::vec::IntoIter<Result<KeyValue>>>;

/// Wrap materialized rows as a [`RangeScan`].
pub fn snapshot(rows: Vec<KeyValue>) -> SnapshotScan {
    stream::iter(rows.into_iter().map(Ok).collect::<Vec<_>>())
}

/// The replicated key-value world state.
///
/// Implementations provide isolation for the duration of one store
/// operation; the store takes no locks of its own.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Scan handle type for this ledger.
    type Scan: RangeScan;

    /// Read the value under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Write `value` under `key`.
    async fn put(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Write each row whose key holds no value yet, as one atomic unit.
    ///
    /// The existence checks and the writes run under the same isolation, so
    /// no other writer can claim a key in between. An empty value counts as
    /// no value. When a key repeats within `rows`, its first row wins. The
    /// result holds one flag per row, `true` where the row was written. On
    /// error the world state is left unchanged.
    async fn insert_absent(&self, rows: Vec<KeyValue>) -> Result<Vec<bool>>;

    /// Scan `[start, end)` in lexicographic key order.
    ///
    /// An empty `start` or `end` leaves that side of the range open, so
    /// `scan("", "")` covers every key.
    async fn scan(&self, start: &str, end: &str) -> Result<Self::Scan>;

    /// Scan at most `page_size` rows matching `query`, resuming after
    /// `bookmark`.
    ///
    /// The returned bookmark resumes after the last row of this page. A page
    /// with no rows echoes the bookmark it was given.
    async fn scan_page(
        &self,
        query: &Query,
        page_size: PageSize,
        bookmark: &Bookmark,
    ) -> Result<ScanPage<Self::Scan>>;
}
