//! Personal ledger repository
//!
//! Owns the single-owner ledger and its transaction ID allocator. The ledger
//! is loaded once at startup and written back once at shutdown, and only if
//! something changed.

use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{info, warn};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Ledger, Money, Summary, Transaction, TransactionId, TransactionKind};

use super::codec::{self, LoadedLedger, Recovery};
use super::file_io::{open_data_file, preserve_damaged, write_atomic};

/// Error for an amount the matching total cannot absorb
pub(crate) fn out_of_range(kind: TransactionKind, amount: Money) -> LedgerError {
    LedgerError::OutOfRange(format!(
        "{} of {} would overflow the ledger's {} total",
        kind,
        amount,
        kind.to_string().to_lowercase()
    ))
}

#[derive(Debug, Default)]
struct LedgerState {
    loaded: LoadedLedger,
    dirty: bool,
}

/// Repository for the personal ledger file
pub struct LedgerRepository {
    path: PathBuf,
    state: RwLock<LedgerState>,
}

impl LedgerRepository {
    /// Create a new ledger repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            state: RwLock::new(LedgerState::default()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> LedgerResult<RwLockReadGuard<'_, LedgerState>> {
        self.state
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> LedgerResult<RwLockWriteGuard<'_, LedgerState>> {
        self.state
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Load the ledger from disk
    ///
    /// A missing, unreadable or damaged file never fails the load: whatever
    /// can be recovered is kept (possibly nothing) and damaged files are
    /// copied aside first. A damaged load leaves the repository dirty so the
    /// next save rewrites the file with what was recovered.
    pub fn load(&self) -> LedgerResult<()> {
        let mut damaged = false;
        let loaded = match open_data_file(&self.path) {
            None => LoadedLedger::default(),
            Some(reader) => match codec::decode_ledger(reader) {
                Ok(decoded) => {
                    match &decoded.recovery {
                        Recovery::Complete => {
                            if !decoded.value.ledger.totals_consistent() {
                                let (income, expense) = decoded.value.ledger.recomputed_totals();
                                warn!(
                                    path = %self.path.display(),
                                    stored_income = %decoded.value.ledger.total_income(),
                                    stored_expense = %decoded.value.ledger.total_expense(),
                                    summed_income = %income,
                                    summed_expense = %expense,
                                    "Stored ledger totals disagree with its transactions"
                                );
                            }
                        }
                        Recovery::Truncated {
                            expected,
                            recovered,
                            reason,
                        } => {
                            warn!(
                                path = %self.path.display(),
                                expected,
                                recovered,
                                reason = %reason,
                                "Ledger file damaged, keeping recovered transactions"
                            );
                            self.keep_damaged_copy();
                            damaged = true;
                        }
                        Recovery::TrailingData {
                            extra_lines,
                            first_line,
                        } => {
                            warn!(
                                path = %self.path.display(),
                                extra_lines,
                                first_line,
                                "Ledger file has lines past its declared records, ignoring them"
                            );
                            self.keep_damaged_copy();
                            damaged = true;
                        }
                    }
                    decoded.value
                }
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "Ledger file unreadable, starting fresh");
                    self.keep_damaged_copy();
                    damaged = true;
                    LoadedLedger::default()
                }
            },
        };

        info!(
            path = %self.path.display(),
            transactions = loaded.ledger.len(),
            "Loaded personal ledger"
        );

        let mut state = self.write()?;
        state.loaded = loaded;
        state.dirty = damaged;
        Ok(())
    }

    fn keep_damaged_copy(&self) {
        match preserve_damaged(&self.path) {
            Ok(copy) => warn!(copy = %copy.display(), "Saved a copy of the damaged ledger file"),
            Err(e) => warn!(error = %e, "Could not copy damaged ledger file"),
        }
    }

    /// Write the ledger to disk
    pub fn save(&self) -> LedgerResult<()> {
        let mut state = self.write()?;
        let last = state.loaded.ids.last_issued();
        write_atomic(&self.path, |w| codec::encode_ledger(w, &state.loaded.ledger, last))?;
        state.dirty = false;
        Ok(())
    }

    /// Whether there are unsaved changes
    pub fn is_dirty(&self) -> LedgerResult<bool> {
        Ok(self.read()?.dirty)
    }

    /// Record a transaction
    pub fn add(
        &self,
        kind: TransactionKind,
        category: impl Into<String>,
        amount: Money,
    ) -> LedgerResult<Transaction> {
        let mut state = self.write()?;
        let LedgerState { loaded, dirty } = &mut *state;
        if !loaded.ledger.accepts(kind, amount) {
            return Err(out_of_range(kind, amount));
        }
        let txn = loaded
            .ledger
            .add(&mut loaded.ids, kind, category, amount)
            .clone();
        *dirty = true;
        Ok(txn)
    }

    /// Delete a transaction; `None` if it wasn't there
    pub fn delete(&self, id: TransactionId) -> LedgerResult<Option<Transaction>> {
        let mut state = self.write()?;
        let removed = state.loaded.ledger.delete_transaction(id);
        if removed.is_some() {
            state.dirty = true;
        }
        Ok(removed)
    }

    pub fn get(&self, id: TransactionId) -> LedgerResult<Option<Transaction>> {
        Ok(self.read()?.loaded.ledger.get(id).cloned())
    }

    /// All transactions in ascending ID order
    pub fn list(&self) -> LedgerResult<Vec<Transaction>> {
        Ok(self.read()?.loaded.ledger.list_transactions())
    }

    pub fn summary(&self) -> LedgerResult<Summary> {
        Ok(self.read()?.loaded.ledger.summary())
    }

    /// Snapshot of the whole ledger
    pub fn snapshot(&self) -> LedgerResult<Ledger> {
        Ok(self.read()?.loaded.ledger.clone())
    }

    pub fn count(&self) -> LedgerResult<usize> {
        Ok(self.read()?.loaded.ledger.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, LedgerRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ledger.jsonl");
        let repo = LedgerRepository::new(path);
        (temp_dir, repo)
    }

    fn damaged_copies(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains(".damaged-"))
            .count()
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        assert_eq!(repo.count().unwrap(), 0);
        let summary = repo.summary().unwrap();
        assert_eq!(summary.total_income, Money::zero());
        assert_eq!(summary.total_expense, Money::zero());
        assert!(!repo.is_dirty().unwrap());
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        repo.add(TransactionKind::Income, "Salary", Money::from_cents(100000))
            .unwrap();
        repo.add(TransactionKind::Expense, "Rent", Money::from_cents(40000))
            .unwrap();
        assert!(repo.is_dirty().unwrap());
        repo.save().unwrap();
        assert!(!repo.is_dirty().unwrap());

        let repo2 = LedgerRepository::new(temp_dir.path().join("ledger.jsonl"));
        repo2.load().unwrap();

        assert_eq!(repo2.snapshot().unwrap(), repo.snapshot().unwrap());
        assert_eq!(repo2.summary().unwrap().net, Money::from_cents(60000));
    }

    #[test]
    fn test_ids_continue_after_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        repo.add(TransactionKind::Income, "A", Money::from_cents(1)).unwrap();
        let last = repo
            .add(TransactionKind::Income, "B", Money::from_cents(1))
            .unwrap();
        repo.delete(last.id).unwrap();
        repo.save().unwrap();

        let repo2 = LedgerRepository::new(temp_dir.path().join("ledger.jsonl"));
        repo2.load().unwrap();
        let next = repo2
            .add(TransactionKind::Expense, "C", Money::from_cents(1))
            .unwrap();

        assert_eq!(next.id, TransactionId::new(3));
    }

    #[test]
    fn test_delete_missing_does_not_dirty() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        assert!(repo.delete(TransactionId::new(5)).unwrap().is_none());
        assert!(!repo.is_dirty().unwrap());
    }

    #[test]
    fn test_garbage_file_loads_empty_and_is_preserved() {
        let (temp_dir, repo) = create_test_repo();
        fs::write(repo.path(), "3\nIncome\nSalary\n").unwrap();

        repo.load().unwrap();

        assert_eq!(repo.count().unwrap(), 0);
        assert_eq!(damaged_copies(temp_dir.path()), 1);
        assert!(repo.is_dirty().unwrap());
    }

    #[test]
    fn test_damaged_file_is_copied_once_and_repaired() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        for i in 0..3 {
            repo.add(TransactionKind::Income, format!("I{}", i), Money::from_cents(100))
                .unwrap();
        }
        repo.save().unwrap();

        let text = fs::read_to_string(repo.path()).unwrap();
        let cut: String = text.lines().take(2).map(|l| format!("{}\n", l)).collect();
        fs::write(repo.path(), cut).unwrap();

        // Three read-only runs, each saving only when dirty
        for _ in 0..3 {
            let run = LedgerRepository::new(repo.path().to_path_buf());
            run.load().unwrap();
            if run.is_dirty().unwrap() {
                run.save().unwrap();
            }
            assert_eq!(run.count().unwrap(), 1);
        }

        assert_eq!(damaged_copies(temp_dir.path()), 1);
    }

    #[test]
    fn test_extra_lines_are_preserved_and_dropped() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        repo.add(TransactionKind::Income, "A", Money::from_cents(100))
            .unwrap();
        repo.save().unwrap();

        let mut text = fs::read_to_string(repo.path()).unwrap();
        text.push_str("leftover\n");
        fs::write(repo.path(), text).unwrap();

        let repo2 = LedgerRepository::new(repo.path().to_path_buf());
        repo2.load().unwrap();
        assert_eq!(repo2.count().unwrap(), 1);
        assert!(repo2.is_dirty().unwrap());
        assert_eq!(damaged_copies(temp_dir.path()), 1);

        repo2.save().unwrap();
        assert!(!fs::read_to_string(repo.path()).unwrap().contains("leftover"));
    }

    #[test]
    fn test_overflowing_amount_is_refused() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        let big = Money::parse("92233720368547758").unwrap();

        repo.add(TransactionKind::Income, "A", big).unwrap();
        let err = repo.add(TransactionKind::Income, "B", big).unwrap_err();
        assert!(matches!(err, LedgerError::OutOfRange(_)));

        // The lock is still usable and nothing changed
        assert_eq!(repo.count().unwrap(), 1);
        assert_eq!(repo.summary().unwrap().total_income, big);
        let next = repo
            .add(TransactionKind::Income, "C", Money::from_cents(1))
            .unwrap();
        assert_eq!(next.id, TransactionId::new(2));
    }

    #[test]
    fn test_truncated_file_keeps_prefix() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        for i in 0..4 {
            repo.add(TransactionKind::Expense, format!("E{}", i), Money::from_cents(100))
                .unwrap();
        }
        repo.save().unwrap();

        let text = fs::read_to_string(repo.path()).unwrap();
        let cut: String = text.lines().take(3).map(|l| format!("{}\n", l)).collect();
        fs::write(repo.path(), cut).unwrap();

        let repo2 = LedgerRepository::new(repo.path().to_path_buf());
        repo2.load().unwrap();

        assert_eq!(repo2.count().unwrap(), 2);
        assert_eq!(repo2.summary().unwrap().total_expense, Money::from_cents(200));
        assert_eq!(damaged_copies(temp_dir.path()), 1);

        // Numbering still continues above everything that was ever issued
        let next = repo2
            .add(TransactionKind::Income, "X", Money::from_cents(1))
            .unwrap();
        assert_eq!(next.id, TransactionId::new(5));
    }
}
