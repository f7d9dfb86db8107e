//! JSON export of a single ledger

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Summary, Transaction, UserId};
use crate::services::{LedgerScope, LedgerService, UserService};
use crate::storage::Storage;

/// Who the exported ledger belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOwner {
    pub id: UserId,
    pub name: String,
}

/// One ledger with its totals, ready to serialize
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerExport {
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    /// `None` for the personal ledger
    pub owner: Option<ExportOwner>,

    pub summary: Summary,

    pub transactions: Vec<Transaction>,
}

impl LedgerExport {
    /// Build an export of the ledger in `scope`
    pub fn from_storage(storage: &Storage, scope: LedgerScope) -> LedgerResult<Self> {
        let owner = match scope {
            LedgerScope::Personal => None,
            LedgerScope::User(id) => {
                let user = UserService::new(storage)
                    .get_user(id)?
                    .ok_or_else(|| LedgerError::user_not_found(id.to_string()))?;
                Some(ExportOwner {
                    id: user.id,
                    name: user.name,
                })
            }
        };

        let ledger = LedgerService::new(storage, scope).ledger()?;

        Ok(Self {
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            owner,
            summary: ledger.summary(),
            transactions: ledger.list_transactions(),
        })
    }
}

/// Write a ledger export as JSON
pub fn export_ledger_json<W: Write>(
    export: &LedgerExport,
    writer: &mut W,
    pretty: bool,
) -> LedgerResult<()> {
    let written = if pretty {
        serde_json::to_writer_pretty(&mut *writer, export)
    } else {
        serde_json::to_writer(&mut *writer, export)
    };
    written.map_err(|e| LedgerError::Export(format!("Failed to write JSON: {}", e)))?;

    writeln!(writer).map_err(|e| LedgerError::Export(e.to_string()))?;
    Ok(())
}
