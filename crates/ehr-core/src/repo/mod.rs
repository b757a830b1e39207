//! Record types and their canonical encoding.
//!
//! This module defines the record entity, the page envelope returned by
//! paginated listing, and the codec that turns records into the bytes kept
//! on the ledger. The operations themselves live on
//! [`RecordStore`](crate::RecordStore).

pub mod codec;
mod page;
mod record;

pub use page::Page;
pub use record::{NewRecord, Record, StoredRecord};
