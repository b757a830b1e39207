//! End-to-end behaviour of the record store over an in-memory ledger.

use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll};

use async_trait::async_trait;
use futures_core::Stream;

use ehr_core::traits::{SnapshotScan, snapshot};
use ehr_core::{
    Bookmark, Error, KeyValue, Ledger, MemoryLedger, NewRecord, PageSize, Query, RecordId,
    RecordStore, Result, ScanPage, Timestamp, TxContext, codec,
};

fn ctx() -> TxContext {
    TxContext::new("tx-1", Timestamp::parse("2024-03-01T12:00:00.000Z").unwrap())
}

fn draft(id: &str, name: &str) -> NewRecord {
    NewRecord {
        name: name.to_string(),
        size: "100 kB".to_string(),
        ..NewRecord::new(RecordId::new(id).unwrap())
    }
}

fn id(s: &str) -> RecordId {
    RecordId::new(s).unwrap()
}

// ============================================================================
// Example scenario
// ============================================================================

#[tokio::test]
async fn test_example_scenario() {
    let store = RecordStore::new(MemoryLedger::new());

    store.create(&ctx(), draft("r1", "Annette KOEPP")).await.unwrap();

    let record = store.read(&id("r1")).await.unwrap();
    assert_eq!(record.name, "Annette KOEPP");
    assert_eq!(record.size, "100 kB");
    assert!(!record.doc);
    assert!(record.text_data.is_empty());
    assert!(record.created_at.is_some());

    assert!(store.exists(&id("r1")).await.unwrap());

    let err = store
        .create(&ctx(), draft("r1", "Someone Else"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::AlreadyExists { ref id } if id == "r1"));

    store.create(&ctx(), draft("r2", "Tony RUTHERFORD")).await.unwrap();
    let all = store.list_all().await.unwrap();
    let names: Vec<_> = all.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Annette KOEPP", "Tony RUTHERFORD"]);
}

// ============================================================================
// Properties
// ============================================================================

#[tokio::test]
async fn test_roundtrip_through_ledger() {
    let store = RecordStore::new(MemoryLedger::new());
    let record = NewRecord {
        text_data: "line one\nline two \u{1F4C4}".to_string(),
        doc: true,
        file_type: "application/pdf".to_string(),
        file_name: "scan \"final\".pdf".to_string(),
        base64_string: "JVBERi0xLjQK".to_string(),
        ..draft("doc-1", "Zoë Ünal")
    };

    let stored = store.create(&ctx(), record).await.unwrap();
    let read = store.read(&id("doc-1")).await.unwrap();
    assert_eq!(read, stored.record);
    assert_eq!(codec::encode(&read).unwrap(), stored.encoded);
}

#[tokio::test]
async fn test_existence_is_monotonic() {
    let store = RecordStore::new(MemoryLedger::new());
    assert!(!store.exists(&id("m")).await.unwrap());

    store.create(&ctx(), draft("m", "M")).await.unwrap();
    for _ in 0..3 {
        assert!(store.exists(&id("m")).await.unwrap());
        let _ = store.create(&ctx(), draft("m", "again")).await;
        store.create_batch(&ctx(), [draft("m", "batch")]).await.unwrap();
    }
    assert_eq!(store.read(&id("m")).await.unwrap().name, "M");
}

#[tokio::test]
async fn test_pagination_matches_list_all_for_every_page_size() {
    let store = RecordStore::new(MemoryLedger::new());
    let drafts: Vec<_> = (0..11)
        .map(|n| draft(&format!("rec-{n:02}"), &format!("Patient {n}")))
        .collect();
    store.create_batch(&ctx(), drafts).await.unwrap();

    let expected = store.list_all().await.unwrap();
    assert_eq!(expected.len(), 11);

    for size in 1..=12 {
        let page_size = PageSize::new(size).unwrap();
        let mut bookmark = Bookmark::start();
        let mut collected = Vec::new();

        loop {
            let page = store
                .list_page(&Query::all(), page_size, &bookmark)
                .await
                .unwrap();
            if page.data.is_empty() {
                break;
            }
            collected.extend(page.data);
            bookmark = page.bookmark;
        }

        assert_eq!(collected, expected, "page size {size}");
    }
}

// ============================================================================
// Scan handle release
// ============================================================================

/// Scan that counts how many handles are alive.
struct TrackedScan {
    inner: SnapshotScan,
    open: Arc<AtomicUsize>,
}

impl Stream for TrackedScan {
    type Item = Result<KeyValue>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

impl Drop for TrackedScan {
    fn drop(&mut self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}

struct TrackingLedger {
    inner: MemoryLedger,
    open: Arc<AtomicUsize>,
}

impl TrackingLedger {
    fn track(&self, inner: SnapshotScan) -> TrackedScan {
        self.open.fetch_add(1, Ordering::SeqCst);
        TrackedScan {
            inner,
            open: self.open.clone(),
        }
    }
}

#[async_trait]
impl Ledger for TrackingLedger {
    type Scan = TrackedScan;

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        self.inner.put(key, value).await
    }

    async fn insert_absent(&self, rows: Vec<KeyValue>) -> Result<Vec<bool>> {
        self.inner.insert_absent(rows).await
    }

    async fn scan(&self, start: &str, end: &str) -> Result<Self::Scan> {
        let rows = self.inner.snapshot_state()?.scan(start, end);
        Ok(self.track(snapshot(rows)))
    }

    async fn scan_page(
        &self,
        query: &Query,
        page_size: PageSize,
        bookmark: &Bookmark,
    ) -> Result<ScanPage<Self::Scan>> {
        let (rows, bookmark) = self
            .inner
            .snapshot_state()?
            .scan_page(query, page_size, bookmark);
        Ok(ScanPage {
            rows: self.track(snapshot(rows)),
            bookmark,
        })
    }
}

#[tokio::test]
async fn test_scan_handles_released_on_decode_failure() {
    let open = Arc::new(AtomicUsize::new(0));
    let ledger = TrackingLedger {
        inner: MemoryLedger::new(),
        open: open.clone(),
    };
    let store = RecordStore::new(ledger);

    store.create(&ctx(), draft("a", "A")).await.unwrap();
    store.ledger().put("b", b"{\"id\":").await.unwrap();
    store.create(&ctx(), draft("c", "C")).await.unwrap();

    assert!(matches!(store.list_all().await, Err(Error::Decode(_))));
    assert_eq!(open.load(Ordering::SeqCst), 0);

    let result = store
        .list_page(&Query::all(), PageSize::new(5).unwrap(), &Bookmark::start())
        .await;
    assert!(matches!(result, Err(Error::Decode(_))));
    assert_eq!(open.load(Ordering::SeqCst), 0);

    let page = store
        .list_page(&Query::all(), PageSize::new(1).unwrap(), &Bookmark::start())
        .await
        .unwrap();
    assert_eq!(page.data.len(), 1);
    assert_eq!(open.load(Ordering::SeqCst), 0);
}
