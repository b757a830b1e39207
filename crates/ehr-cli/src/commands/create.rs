//! Create command implementation.

use anyhow::{Context, Result};
use clap::Args;

use ehr_core::NewRecord;

use crate::cli::{GlobalArgs, TxArgs};
use crate::{config, output};

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// JSON file with the record (use - for stdin)
    #[arg(long, default_value = "-")]
    pub json: String,

    #[command(flatten)]
    pub tx: TxArgs,
}

pub async fn run(global: &GlobalArgs, args: CreateArgs) -> Result<()> {
    let input = super::read_input(&args.json)?;
    let record: NewRecord = serde_json::from_str(&input).context("Invalid record JSON")?;

    let store = config::open_store(global)?;
    let ctx = config::tx_context(&args.tx)?;

    let stored = store
        .create(&ctx, record)
        .await
        .context("Failed to create record")?;

    output::ledger_bytes(&stored.encoded)?;
    output::committed(format_args!("Created record: {}", stored.record.id));

    Ok(())
}
