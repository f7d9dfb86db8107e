//! CLI command for exporting a ledger
//!
//! Writes the selected ledger to a CSV or JSON file.

use clap::{Args, ValueEnum};
use std::path::PathBuf;

use crate::error::LedgerResult;
use crate::export::{export_ledger_json, export_transactions_csv, LedgerExport};
use crate::services::LedgerScope;
use crate::storage::file_io::write_atomic;
use crate::storage::Storage;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// CSV format (transactions only)
    Csv,
    /// JSON format (owner, totals and transactions)
    Json,
}

/// Arguments for `export`
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output file path
    pub output: PathBuf,

    /// Export format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ExportFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Handle the export command
pub fn handle_export_command(
    storage: &Storage,
    scope: LedgerScope,
    args: ExportArgs,
) -> LedgerResult<()> {
    let export = LedgerExport::from_storage(storage, scope)?;

    match args.format {
        ExportFormat::Csv => {
            write_atomic(&args.output, |writer| {
                export_transactions_csv(&export.transactions, &mut *writer)
            })?;
        }
        ExportFormat::Json => {
            write_atomic(&args.output, |writer| {
                export_ledger_json(&export, writer, args.pretty)
            })?;
        }
    }

    println!(
        "Exported {} transactions ({}) to: {}",
        export.transactions.len(),
        scope,
        args.output.display()
    );

    Ok(())
}
