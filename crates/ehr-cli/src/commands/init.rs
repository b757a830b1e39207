//! Init command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::{GlobalArgs, TxArgs};
use crate::{config, output};

#[derive(Args, Debug)]
pub struct InitArgs {
    #[command(flatten)]
    pub tx: TxArgs,
}

pub async fn run(global: &GlobalArgs, args: InitArgs) -> Result<()> {
    let store = config::open_store(global)?;
    let ctx = config::tx_context(&args.tx)?;

    let stored = store
        .init_ledger(&ctx)
        .await
        .context("Failed to seed ledger")?;

    output::detail("Id", &stored.record.id);
    output::committed("Ledger seeded");

    Ok(())
}
