//! List page command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::GlobalArgs;
use crate::{config, output};

#[derive(Args, Debug)]
pub struct ListPageArgs {
    /// Maximum number of records to return
    #[arg(long, allow_hyphen_values = true)]
    pub page_size: String,

    /// Bookmark from a previous page (empty to start)
    #[arg(long, default_value = "")]
    pub bookmark: String,

    /// Range/selector query, e.g. '{"selector":{"doc":true}}'
    #[arg(long, default_value = "")]
    pub query: String,

    /// Print the whole page envelope as JSON
    #[arg(long)]
    pub envelope: bool,
}

pub async fn run(global: &GlobalArgs, args: ListPageArgs) -> Result<()> {
    let store = config::open_store(global)?;

    let page = store
        .list_page_raw(&args.query, &args.page_size, &args.bookmark)
        .await
        .context("Failed to list page")?;

    if args.envelope {
        return output::document(&page, output::Layout::Line);
    }

    output::records(&page.data)?;

    if !page.is_exhausted() {
        eprintln!();
        output::detail("Next bookmark", &page.bookmark);
    }

    Ok(())
}
