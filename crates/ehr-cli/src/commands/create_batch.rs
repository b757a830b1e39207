//! Create batch command implementation.

use anyhow::{Context, Result};
use clap::Args;

use ehr_core::NewRecord;

use crate::cli::{GlobalArgs, TxArgs};
use crate::{config, output};

#[derive(Args, Debug)]
pub struct CreateBatchArgs {
    /// JSON file with an array of records (use - for stdin)
    #[arg(long, default_value = "-")]
    pub json: String,

    #[command(flatten)]
    pub tx: TxArgs,
}

pub async fn run(global: &GlobalArgs, args: CreateBatchArgs) -> Result<()> {
    let input = super::read_input(&args.json)?;
    let records: Vec<NewRecord> =
        serde_json::from_str(&input).context("Invalid record array JSON")?;
    let submitted = records.len();

    let store = config::open_store(global)?;
    let ctx = config::tx_context(&args.tx)?;

    store
        .create_batch(&ctx, records)
        .await
        .context("Failed to create records")?;

    output::committed(format_args!("Processed {} record(s)", submitted));

    Ok(())
}
