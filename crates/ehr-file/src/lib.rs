//! ehr-file - Filesystem-backed ledger.

mod ledger;

pub use ledger::FileLedger;
