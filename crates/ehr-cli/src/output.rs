//! Terminal output.
//!
//! Anything another program may consume (records, pages, ledger bytes) goes
//! to stdout, one document per line. Status lines for the person at the
//! terminal go to stderr.

use std::fmt::Display;
use std::io::{self, Write};

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use ehr_core::Record;

/// Layout of JSON written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// One document per line.
    Line,
    /// Indented, for reading.
    Pretty,
}

/// Write one JSON document to stdout.
pub fn document<T: Serialize>(value: &T, layout: Layout) -> Result<()> {
    let mut out = io::stdout().lock();
    match layout {
        Layout::Line => serde_json::to_writer(&mut out, value)?,
        Layout::Pretty => serde_json::to_writer_pretty(&mut out, value)?,
    }
    writeln!(out)?;
    Ok(())
}

/// Write records as JSON lines, noting on stderr when there are none.
pub fn records(records: &[Record]) -> Result<()> {
    if records.is_empty() {
        eprintln!("{}", "No records found.".dimmed());
        return Ok(());
    }

    let mut out = io::stdout().lock();
    for record in records {
        serde_json::to_writer(&mut out, record)?;
        writeln!(out)?;
    }
    Ok(())
}

/// Write the exact bytes a command put on the ledger.
pub fn ledger_bytes(bytes: &[u8]) -> Result<()> {
    let mut out = io::stdout().lock();
    out.write_all(bytes)?;
    writeln!(out)?;
    Ok(())
}

/// Confirm a ledger write.
pub fn committed(what: impl Display) {
    eprintln!("{} {}", "✓".green(), what);
}

/// Show a labeled value.
pub fn detail(label: &str, value: impl Display) {
    eprintln!("{}: {}", label.dimmed(), value);
}

/// Report a failed command, with the store's error code when there is one.
pub fn failure(err: &anyhow::Error) {
    let code = err
        .downcast_ref::<ehr_core::Error>()
        .map(|store_err| format!(" [{}]", store_err.code()))
        .unwrap_or_default();

    eprintln!("{} {:#}{}", "✗".red(), err, code.yellow());
}
