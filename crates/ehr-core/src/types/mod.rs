//! Validated value types.
//!
//! These types enforce their invariants at construction time,
//! so a store operation never sees an empty id or a zero page size.

mod bookmark;
mod page_size;
mod query;
mod record_id;
mod timestamp;

pub use bookmark::Bookmark;
pub use page_size::PageSize;
pub use query::Query;
pub use record_id::RecordId;
pub use timestamp::Timestamp;
