//! ehr-core - Deterministic health record store over a replicated ledger.
//!
//! Every node of the ledger network executes the same operations against its
//! own copy of the world state, so every write must produce the same bytes on
//! every node. This crate holds the record entity and its canonical encoding,
//! the [`RecordStore`] operations, and bookmark-continued pagination.
//!
//! # Example
//!
//! ```
//! use ehr_core::{MemoryLedger, NewRecord, RecordId, RecordStore, Timestamp, TxContext};
//!
//! # async fn example() -> ehr_core::Result<()> {
//! let store = RecordStore::new(MemoryLedger::new());
//! let ctx = TxContext::new("tx-1", Timestamp::from_unix_millis(1_700_000_000_000)?);
//!
//! let record = NewRecord {
//!     name: "Annette KOEPP".to_string(),
//!     size: "100 kB".to_string(),
//!     ..NewRecord::new(RecordId::new("r1")?)
//! };
//! store.create(&ctx, record).await?;
//!
//! let stored = store.read(&RecordId::new("r1")?).await?;
//! assert!(stored.created_at.is_some());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod memory;
mod paginate;
pub mod repo;
mod store;
pub mod traits;
pub mod types;

pub use error::Error;
pub use memory::{MemoryLedger, WorldState};
pub use repo::{NewRecord, Page, Record, StoredRecord, codec};
pub use store::{RecordStore, SAMPLE_RECORD_ID};
pub use traits::{InvocationContext, KeyValue, Ledger, ScanPage, TxContext};
pub use types::{Bookmark, PageSize, Query, RecordId, Timestamp};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
