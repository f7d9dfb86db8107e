//! CLI command for reviewing the audit trail

use clap::Args;

use crate::audit::AuditLogger;
use crate::error::LedgerResult;
use crate::storage::Storage;

/// Arguments for `history`
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Number of entries to show
    #[arg(short, long, default_value = "20")]
    pub limit: usize,
}

/// Handle the history command
///
/// Reads the log even when auditing is switched off, so earlier entries
/// stay visible.
pub fn handle_history_command(storage: &Storage, args: HistoryArgs) -> LedgerResult<()> {
    let logger = AuditLogger::new(storage.paths().audit_log());
    let entries = logger.read_recent(args.limit)?;

    if entries.is_empty() {
        println!("No history recorded.");
        return Ok(());
    }

    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::models::Money;
    use crate::services::LedgerService;
    use tempfile::TempDir;

    #[test]
    fn test_history_after_changes() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths);
        storage.load_all().unwrap();

        let service = LedgerService::personal(&storage);
        service.add_income("Salary", Money::from_cents(100)).unwrap();
        service.add_income("Bonus", Money::from_cents(200)).unwrap();

        handle_history_command(&storage, HistoryArgs { limit: 1 }).unwrap();

        let logger = AuditLogger::new(storage.paths().audit_log());
        assert_eq!(logger.read_recent(1).unwrap().len(), 1);
        assert_eq!(logger.read_all().unwrap().len(), 2);
    }

    #[test]
    fn test_empty_history() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths);
        handle_history_command(&storage, HistoryArgs { limit: 5 }).unwrap();
    }
}
