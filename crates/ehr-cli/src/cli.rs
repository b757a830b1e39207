//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser};

use crate::commands::Command;

/// Health record store CLI backed by a local ledger directory.
#[derive(Parser, Debug)]
#[command(name = "ehr")]
#[command(author, version = env!("EHR_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Directory holding the world state (defaults to the platform data dir)
    #[arg(long, env = "EHR_STATE_DIR", global = true)]
    pub state_dir: Option<PathBuf>,
}

/// Invocation context for commands that write to the ledger.
#[derive(Args, Debug)]
pub struct TxArgs {
    /// Transaction id (defaults to a random UUID)
    #[arg(long)]
    pub tx_id: Option<String>,

    /// Transaction timestamp, RFC 3339 (defaults to the submission time)
    #[arg(long)]
    pub tx_time: Option<String>,
}
