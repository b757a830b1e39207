//! Resolution of the ledger location and invocation context.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use directories::ProjectDirs;
use uuid::Uuid;

use ehr_core::{RecordStore, Timestamp, TxContext};
use ehr_file::FileLedger;

use crate::cli::{GlobalArgs, TxArgs};

/// Get the world state directory.
fn state_dir(global: &GlobalArgs) -> Result<PathBuf> {
    if let Some(dir) = &global.state_dir {
        return Ok(dir.clone());
    }

    let dirs = ProjectDirs::from("", "", "ehr").context("Could not determine data directory")?;
    Ok(dirs.data_dir().join("state"))
}

/// Open the record store over the configured ledger directory.
pub fn open_store(global: &GlobalArgs) -> Result<RecordStore<FileLedger>> {
    let dir = state_dir(global)?;
    tracing::debug!(dir = %dir.display(), "Opening ledger");
    Ok(RecordStore::new(FileLedger::new(dir)))
}

/// Build the invocation context for a write.
///
/// The CLI is the submitting client, so its clock is the agreed timestamp
/// unless one is pinned with `--tx-time`.
pub fn tx_context(args: &TxArgs) -> Result<TxContext> {
    let timestamp = match &args.tx_time {
        Some(text) => Timestamp::parse(text).context("Invalid --tx-time")?,
        None => Timestamp::from_datetime(Utc::now()),
    };

    let tx_id = args
        .tx_id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    Ok(TxContext::new(tx_id, timestamp))
}
