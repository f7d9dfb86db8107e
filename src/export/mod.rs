//! Export module for finledger
//!
//! Exports one ledger (personal or a user's):
//! - CSV: transactions only, spreadsheet-compatible
//! - JSON: owner, totals and transactions

pub mod csv;
pub mod json;

pub use self::csv::export_transactions_csv;
pub use self::json::{export_ledger_json, ExportOwner, LedgerExport};
