//! Bookmark-continued listing.
//!
//! A caller enumerates the ledger one page at a time, echoing back the
//! bookmark from each page. The last page may still carry records, so they
//! are consumed before checking for the end:
//!
//! ```
//! use ehr_core::{Bookmark, MemoryLedger, PageSize, Query, RecordStore};
//!
//! # async fn example() -> ehr_core::Result<()> {
//! let store = RecordStore::new(MemoryLedger::new());
//! let page_size = PageSize::new(50)?;
//! let mut bookmark = Bookmark::start();
//!
//! loop {
//!     let page = store.list_page(&Query::all(), page_size, &bookmark).await?;
//!     for record in &page.data {
//!         println!("{}", record.id);
//!     }
//!     if page.is_exhausted() {
//!         break;
//!     }
//!     bookmark = page.bookmark;
//! }
//! # Ok(())
//! # }
//! ```

use tracing::{debug, instrument};

use crate::Result;
use crate::repo::Page;
use crate::store::{RecordStore, decode_rows};
use crate::traits::Ledger;
use crate::types::{Bookmark, PageSize, Query};

impl<L: Ledger> RecordStore<L> {
    /// One page of records matching `query`, resuming after `bookmark`.
    ///
    /// The query and bookmark are handed to the ledger untouched. The page
    /// holds at most `page_size` records, echoes the caller's bookmark as
    /// `previous_bookmark`, and carries the ledger's new bookmark.
    ///
    /// # Errors
    ///
    /// Fails as a whole with [`Error::Decode`](crate::Error::Decode) if any
    /// row of the page is not a record.
    #[instrument(skip(self), fields(%query, %page_size, %bookmark))]
    pub async fn list_page(
        &self,
        query: &Query,
        page_size: PageSize,
        bookmark: &Bookmark,
    ) -> Result<Page> {
        let scan = self.ledger().scan_page(query, page_size, bookmark).await?;
        let data = decode_rows(scan.rows, Some(page_size.get())).await?;

        debug!(count = data.len(), next = %scan.bookmark, "Listed page");

        Ok(Page {
            data,
            previous_bookmark: bookmark.clone(),
            bookmark: scan.bookmark,
        })
    }

    /// [`list_page`](Self::list_page) from textual arguments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`](crate::Error::InvalidArgument) if
    /// `page_size` is not a positive integer or `query` is malformed.
    pub async fn list_page_raw(&self, query: &str, page_size: &str, bookmark: &str) -> Result<Page> {
        let query = Query::parse(query)?;
        let page_size: PageSize = page_size.parse()?;
        self.list_page(&query, page_size, &Bookmark::new(bookmark))
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use async_trait::async_trait;

    use super::*;
    use crate::error::{Error, InvalidArgumentError, LedgerError};
    use crate::memory::MemoryLedger;
    use crate::repo::NewRecord;
    use crate::traits::{KeyValue, ScanPage, SnapshotScan, TxContext, snapshot};
    use crate::types::{RecordId, Timestamp};

    async fn store_with(ids: &[&str]) -> RecordStore<MemoryLedger> {
        let store = RecordStore::new(MemoryLedger::new());
        let ctx = TxContext::new("tx", Timestamp::from_unix_millis(10).unwrap());
        for id in ids {
            let record = NewRecord {
                doc: id.ends_with('d'),
                ..NewRecord::new(RecordId::new(*id).unwrap())
            };
            store.create(&ctx, record).await.unwrap();
        }
        store
    }

    fn ids(page: &Page) -> Vec<&str> {
        page.data.iter().map(|r| r.id.as_str()).collect()
    }

    #[tokio::test]
    async fn pages_cover_list_all() {
        let store = store_with(&["a", "b", "c", "d", "e", "f", "g"]).await;
        let size = PageSize::new(3).unwrap();

        let mut seen = Vec::new();
        let mut bookmark = Bookmark::start();
        let mut calls = 0;
        loop {
            let page = store.list_page(&Query::all(), size, &bookmark).await.unwrap();
            assert!(page.data.len() <= 3);
            assert_eq!(page.previous_bookmark, bookmark);
            calls += 1;
            if page.data.is_empty() {
                break;
            }
            seen.extend(page.data);
            bookmark = page.bookmark;
        }

        assert_eq!(calls, 4);
        assert_eq!(seen, store.list_all().await.unwrap());
    }

    #[tokio::test]
    async fn empty_page_echoes_bookmark() {
        let store = store_with(&["a"]).await;
        let size = PageSize::new(5).unwrap();

        let first = store.list_page(&Query::all(), size, &Bookmark::start()).await.unwrap();
        assert_eq!(ids(&first), ["a"]);
        assert!(!first.is_exhausted());

        let last = store.list_page(&Query::all(), size, &first.bookmark).await.unwrap();
        assert!(last.data.is_empty());
        assert_eq!(last.bookmark, first.bookmark);
        assert!(last.is_exhausted());
    }

    #[tokio::test]
    async fn query_is_forwarded_to_ledger() {
        let store = store_with(&["a", "bd", "c", "dd"]).await;
        let size = PageSize::new(10).unwrap();

        let page = store
            .list_page(&Query::all().with_field("doc", true), size, &Bookmark::start())
            .await
            .unwrap();
        assert_eq!(ids(&page), ["bd", "dd"]);

        let page = store
            .list_page(&Query::range("b", "d"), size, &Bookmark::start())
            .await
            .unwrap();
        assert_eq!(ids(&page), ["bd", "c"]);
    }

    #[tokio::test]
    async fn bad_row_fails_whole_page() {
        let store = store_with(&["a", "c"]).await;
        store.ledger().put("b", b"garbage").await.unwrap();

        let err = store
            .list_page(&Query::all(), PageSize::new(10).unwrap(), &Bookmark::start())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[tokio::test]
    async fn raw_arguments_are_validated() {
        let store = store_with(&["a", "b"]).await;

        for size in ["0", "-1", "ten", ""] {
            let err = store.list_page_raw("", size, "").await.unwrap_err();
            assert!(
                matches!(err, Error::InvalidArgument(InvalidArgumentError::PageSize { .. })),
                "page size {size:?} should be rejected"
            );
        }

        let err = store.list_page_raw("{", "1", "").await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(InvalidArgumentError::Query { .. })));

        let page = store.list_page_raw("", "1", "").await.unwrap();
        assert_eq!(ids(&page), ["a"]);
        let page = store.list_page_raw("", "1", page.bookmark.as_str()).await.unwrap();
        assert_eq!(ids(&page), ["b"]);
    }

    /// Ledger that ignores the page size.
    struct Greedy(MemoryLedger);

    #[async_trait]
    impl Ledger for Greedy {
        type Scan = SnapshotScan;

        async fn get(&self, key: &str) -> crate::Result<Option<Vec<u8>>> {
            self.0.get(key).await
        }

        async fn put(&self, key: &str, value: &[u8]) -> crate::Result<()> {
            self.0.put(key, value).await
        }

        async fn insert_absent(&self, rows: Vec<KeyValue>) -> crate::Result<Vec<bool>> {
            self.0.insert_absent(rows).await
        }

        async fn scan(&self, start: &str, end: &str) -> crate::Result<Self::Scan> {
            self.0.scan(start, end).await
        }

        async fn scan_page(
            &self,
            _query: &Query,
            _page_size: PageSize,
            _bookmark: &Bookmark,
        ) -> crate::Result<ScanPage<Self::Scan>> {
            let rows: Vec<KeyValue> = self.0.snapshot_state()?.scan("", "");
            Ok(ScanPage {
                rows: snapshot(rows),
                bookmark: Bookmark::new("end"),
            })
        }
    }

    /// Ledger that closes the listing with a full page and an unchanged
    /// bookmark.
    struct Closing(MemoryLedger);

    #[async_trait]
    impl Ledger for Closing {
        type Scan = SnapshotScan;

        async fn get(&self, key: &str) -> crate::Result<Option<Vec<u8>>> {
            self.0.get(key).await
        }

        async fn put(&self, key: &str, value: &[u8]) -> crate::Result<()> {
            self.0.put(key, value).await
        }

        async fn insert_absent(&self, rows: Vec<KeyValue>) -> crate::Result<Vec<bool>> {
            self.0.insert_absent(rows).await
        }

        async fn scan(&self, start: &str, end: &str) -> crate::Result<Self::Scan> {
            self.0.scan(start, end).await
        }

        async fn scan_page(
            &self,
            query: &Query,
            page_size: PageSize,
            bookmark: &Bookmark,
        ) -> crate::Result<ScanPage<Self::Scan>> {
            let (rows, _) = self.0.snapshot_state()?.scan_page(query, page_size, bookmark);
            Ok(ScanPage {
                rows: snapshot(rows),
                bookmark: bookmark.clone(),
            })
        }
    }

    #[tokio::test]
    async fn closing_page_keeps_its_records() {
        let inner = store_with(&["a", "b"]).await.into_ledger();
        let store = RecordStore::new(Closing(inner));

        let mut seen = Vec::new();
        let mut bookmark = Bookmark::start();
        let mut calls = 0;
        loop {
            let page = store
                .list_page(&Query::all(), PageSize::new(10).unwrap(), &bookmark)
                .await
                .unwrap();
            calls += 1;
            seen.extend(page.data.iter().map(|r| r.id.to_string()));
            if page.is_exhausted() {
                break;
            }
            bookmark = page.bookmark;
        }

        assert_eq!(calls, 1);
        assert_eq!(seen, ["a", "b"]);
    }

    #[tokio::test]
    async fn overfull_page_is_a_ledger_fault() {
        let inner = store_with(&["a", "b", "c"]).await.into_ledger();
        let store = RecordStore::new(Greedy(inner));

        let err = store
            .list_page(&Query::all(), PageSize::new(2).unwrap(), &Bookmark::start())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Ledger(LedgerError::Overfull { page_size: 2 })));
    }

    #[tokio::test]
    async fn page_envelope_serializes_camel_case() {
        let store = store_with(&["a"]).await;
        let page = store
            .list_page(&Query::all(), PageSize::new(1).unwrap(), &Bookmark::start())
            .await
            .unwrap();

        let value = serde_json::to_value(&page).unwrap();
        let keys: BTreeSet<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(
            keys,
            BTreeSet::from(["bookmark".to_string(), "data".to_string(), "previousBookmark".to_string()])
        );
        assert_eq!(value["previousBookmark"], "");
        assert_eq!(value["bookmark"], "a");
    }
}
