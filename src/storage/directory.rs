//! User directory repository
//!
//! Manages loading and saving the multi-user directory to users.jsonl. The
//! service layer saves after every mutation.

use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{info, warn};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Ledger, Money, Summary, Transaction, TransactionId, TransactionKind, User, UserDirectory,
    UserId,
};

use super::codec::{self, Recovery};
use super::file_io::{open_data_file, preserve_damaged, write_atomic};
use super::ledger::out_of_range;

/// Repository for the user directory file
pub struct DirectoryRepository {
    path: PathBuf,
    data: RwLock<UserDirectory>,
}

impl DirectoryRepository {
    /// Create a new directory repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(UserDirectory::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> LedgerResult<RwLockReadGuard<'_, UserDirectory>> {
        self.data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> LedgerResult<RwLockWriteGuard<'_, UserDirectory>> {
        self.data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Load the directory from disk
    ///
    /// Same recovery rules as the personal ledger: never fails on bad data,
    /// keeps what can be read, copies damaged files aside. A damaged file is
    /// rewritten straight away with what was recovered.
    pub fn load(&self) -> LedgerResult<()> {
        let mut damaged = false;
        let directory = match open_data_file(&self.path) {
            None => UserDirectory::new(),
            Some(reader) => match codec::decode_directory(reader) {
                Ok(decoded) => {
                    match &decoded.recovery {
                        Recovery::Complete => {}
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
                                "User directory damaged, keeping recovered users"
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
                                "User directory has lines past its declared records, ignoring them"
                            );
                            self.keep_damaged_copy();
                            damaged = true;
                        }
                    }
                    for user in decoded.value.users() {
                        if !user.ledger.totals_consistent() {
                            warn!(
                                user = %user.id,
                                stored_income = %user.ledger.total_income(),
                                stored_expense = %user.ledger.total_expense(),
                                "Stored totals disagree with the user's transactions"
                            );
                        }
                    }
                    decoded.value
                }
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "User directory unreadable, starting fresh");
                    self.keep_damaged_copy();
                    damaged = true;
                    UserDirectory::new()
                }
            },
        };

        info!(
            path = %self.path.display(),
            users = directory.len(),
            "Loaded user directory"
        );

        *self.write()? = directory;

        if damaged {
            if let Err(e) = self.save() {
                warn!(path = %self.path.display(), error = %e, "Could not rewrite damaged user directory");
            }
        }
        Ok(())
    }

    fn keep_damaged_copy(&self) {
        match preserve_damaged(&self.path) {
            Ok(copy) => warn!(copy = %copy.display(), "Saved a copy of the damaged directory file"),
            Err(e) => warn!(error = %e, "Could not copy damaged directory file"),
        }
    }

    /// Write the whole directory to disk
    pub fn save(&self) -> LedgerResult<()> {
        let data = self.read()?;
        write_atomic(&self.path, |w| codec::encode_directory(w, &data))
    }

    /// Register a new user with an empty ledger
    pub fn create_user(&self, name: impl Into<String>) -> LedgerResult<User> {
        let mut data = self.write()?;
        Ok(data.create_user(name).clone())
    }

    pub fn get_user(&self, id: UserId) -> LedgerResult<Option<User>> {
        Ok(self.read()?.get_user(id).cloned())
    }

    /// `(id, name)` pairs in ascending ID order
    pub fn list_users(&self) -> LedgerResult<Vec<(UserId, String)>> {
        Ok(self.read()?.list_users())
    }

    /// Every user with a copy of their ledger
    pub fn get_all(&self) -> LedgerResult<Vec<User>> {
        Ok(self.read()?.users().cloned().collect())
    }

    /// Record a transaction for a user; `None` if the user doesn't exist
    pub fn add_transaction(
        &self,
        user_id: UserId,
        kind: TransactionKind,
        category: impl Into<String>,
        amount: Money,
    ) -> LedgerResult<Option<Transaction>> {
        let mut data = self.write()?;
        if let Some(ledger) = data.ledger(user_id) {
            if !ledger.accepts(kind, amount) {
                return Err(out_of_range(kind, amount));
            }
        }
        Ok(data.add_transaction(user_id, kind, category, amount))
    }

    /// Delete a user's transaction (outer `None`: no such user)
    pub fn delete_transaction(
        &self,
        user_id: UserId,
        id: TransactionId,
    ) -> LedgerResult<Option<Option<Transaction>>> {
        let mut data = self.write()?;
        Ok(data.delete_transaction(user_id, id))
    }

    pub fn ledger(&self, user_id: UserId) -> LedgerResult<Option<Ledger>> {
        Ok(self.read()?.ledger(user_id).cloned())
    }

    pub fn summary(&self, user_id: UserId) -> LedgerResult<Option<Summary>> {
        Ok(self.read()?.summary(user_id))
    }

    pub fn count(&self) -> LedgerResult<usize> {
        Ok(self.read()?.len())
    }
}
