//! List command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::GlobalArgs;
use crate::{config, output};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Print the records as one JSON array
    #[arg(long)]
    pub array: bool,
}

pub async fn run(global: &GlobalArgs, args: ListArgs) -> Result<()> {
    let store = config::open_store(global)?;
    let records = store.list_all().await.context("Failed to list records")?;

    if args.array {
        return output::document(&records, output::Layout::Line);
    }

    output::records(&records)
}
