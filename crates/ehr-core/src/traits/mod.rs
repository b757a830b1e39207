//! Collaborator traits consumed by the record store.

mod context;
mod ledger;

pub use context::{InvocationContext, TxContext};
pub use ledger::{KeyValue, Ledger, RangeScan, ScanPage, SnapshotScan, snapshot};
