//! Read command implementation.

use anyhow::{Context, Result};
use clap::Args;

use ehr_core::RecordId;

use crate::cli::GlobalArgs;
use crate::{config, output};

#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Record id
    pub id: String,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(global: &GlobalArgs, args: ReadArgs) -> Result<()> {
    let id = RecordId::new(&args.id).context("Invalid record id")?;
    let store = config::open_store(global)?;

    let record = store.read(&id).await.context("Failed to read record")?;

    let layout = if args.pretty {
        output::Layout::Pretty
    } else {
        output::Layout::Line
    };

    output::document(&record, layout)
}
