//! Subcommand implementations.

mod create;
mod create_batch;
mod exists;
mod init;
mod list;
mod list_page;
mod read;

use anyhow::Result;
use clap::Subcommand;

use crate::cli::GlobalArgs;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Seed the ledger with a sample record
    Init(init::InitArgs),

    /// Create a record from JSON
    Create(create::CreateArgs),

    /// Create records from a JSON array, skipping ids that exist
    CreateBatch(create_batch::CreateBatchArgs),

    /// Fetch a single record
    Read(read::ReadArgs),

    /// Check whether a record exists
    Exists(exists::ExistsArgs),

    /// List every record
    List(list::ListArgs),

    /// List one page of records
    ListPage(list_page::ListPageArgs),
}

pub async fn handle(global: GlobalArgs, command: Command) -> Result<()> {
    match command {
        Command::Init(args) => init::run(&global, args).await,
        Command::Create(args) => create::run(&global, args).await,
        Command::CreateBatch(args) => create_batch::run(&global, args).await,
        Command::Read(args) => read::run(&global, args).await,
        Command::Exists(args) => exists::run(&global, args).await,
        Command::List(args) => list::run(&global, args).await,
        Command::ListPage(args) => list_page::run(&global, args).await,
    }
}

/// Read JSON input from a file path, or stdin for `-`.
fn read_input(path: &str) -> Result<String> {
    use anyhow::Context;
    use std::io::{self, Read};

    if path == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).context("Failed to read JSON file")
    }
}
