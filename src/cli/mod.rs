//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod export;
pub mod history;
pub mod ledger;
pub mod user;

pub use export::{handle_export_command, ExportArgs, ExportFormat};
pub use history::{handle_history_command, HistoryArgs};
pub use ledger::{handle_ledger_command, LedgerCommands};
pub use user::{handle_user_command, parse_user_id, UserCommands};
