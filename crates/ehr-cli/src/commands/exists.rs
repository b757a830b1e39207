//! Exists command implementation.

use anyhow::{Context, Result};
use clap::Args;

use ehr_core::RecordId;

use crate::cli::GlobalArgs;
use crate::config;

#[derive(Args, Debug)]
pub struct ExistsArgs {
    /// Record id
    pub id: String,
}

pub async fn run(global: &GlobalArgs, args: ExistsArgs) -> Result<()> {
    let id = RecordId::new(&args.id).context("Invalid record id")?;
    let store = config::open_store(global)?;

    let exists = store
        .exists(&id)
        .await
        .context("Failed to check record")?;
    println!("{}", exists);

    Ok(())
}
