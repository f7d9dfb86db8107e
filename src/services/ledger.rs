//! Ledger service
//!
//! Business logic for adding, deleting, listing and summarising
//! transactions. The same operations work on the personal ledger or on one
//! user's ledger in the directory; only the persistence cadence differs.

use std::fmt;

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Ledger, Money, Summary, Transaction, TransactionId, TransactionKind, UserId};
use crate::storage::Storage;

/// Which ledger an operation applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerScope {
    /// The single-owner ledger, saved once at shutdown
    Personal,
    /// A user's ledger in the directory, saved after every change
    User(UserId),
}

impl fmt::Display for LedgerScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Personal => write!(f, "personal"),
            Self::User(id) => write!(f, "{}", id),
        }
    }
}

/// Service for transaction management within one ledger
pub struct LedgerService<'a> {
    storage: &'a Storage,
    scope: LedgerScope,
}

impl<'a> LedgerService<'a> {
    pub fn new(storage: &'a Storage, scope: LedgerScope) -> Self {
        Self { storage, scope }
    }

    /// Service for the personal ledger
    pub fn personal(storage: &'a Storage) -> Self {
        Self::new(storage, LedgerScope::Personal)
    }

    /// Service for a user's ledger
    pub fn for_user(storage: &'a Storage, user_id: UserId) -> Self {
        Self::new(storage, LedgerScope::User(user_id))
    }

    pub fn scope(&self) -> LedgerScope {
        self.scope
    }

    /// Record income
    pub fn add_income(&self, category: &str, amount: Money) -> LedgerResult<Transaction> {
        self.add(TransactionKind::Income, category, amount)
    }

    /// Record an expense
    pub fn add_expense(&self, category: &str, amount: Money) -> LedgerResult<Transaction> {
        self.add(TransactionKind::Expense, category, amount)
    }

    fn add(&self, kind: TransactionKind, category: &str, amount: Money) -> LedgerResult<Transaction> {
        let txn = match self.scope {
            LedgerScope::Personal => self.storage.ledger.add(kind, category, amount)?,
            LedgerScope::User(user_id) => {
                let txn = self
                    .storage
                    .directory
                    .add_transaction(user_id, kind, category, amount)?
                    .ok_or_else(|| LedgerError::user_not_found(user_id.to_string()))?;
                self.storage.persist_directory();
                txn
            }
        };

        self.storage.log_create(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(format!("{} ({})", txn.category, self.scope)),
            &txn,
        );

        Ok(txn)
    }

    /// Delete a transaction
    ///
    /// Returns `Ok(None)` when the ID isn't in this ledger; nothing changes
    /// then. A missing user is an error.
    pub fn delete_transaction(&self, id: TransactionId) -> LedgerResult<Option<Transaction>> {
        let removed = match self.scope {
            LedgerScope::Personal => self.storage.ledger.delete(id)?,
            LedgerScope::User(user_id) => {
                let removed = self
                    .storage
                    .directory
                    .delete_transaction(user_id, id)?
                    .ok_or_else(|| LedgerError::user_not_found(user_id.to_string()))?;
                if removed.is_some() {
                    self.storage.persist_directory();
                }
                removed
            }
        };

        if let Some(txn) = &removed {
            self.storage.log_delete(
                EntityType::Transaction,
                txn.id.to_string(),
                Some(format!("{} ({})", txn.category, self.scope)),
                txn,
            );
        }

        Ok(removed)
    }

    /// All transactions in ascending ID order
    pub fn list_transactions(&self) -> LedgerResult<Vec<Transaction>> {
        match self.scope {
            LedgerScope::Personal => self.storage.ledger.list(),
            LedgerScope::User(_) => Ok(self.ledger()?.list_transactions()),
        }
    }

    pub fn get_transaction(&self, id: TransactionId) -> LedgerResult<Option<Transaction>> {
        match self.scope {
            LedgerScope::Personal => self.storage.ledger.get(id),
            LedgerScope::User(_) => Ok(self.ledger()?.get(id).cloned()),
        }
    }

    /// Income, expense and net totals
    pub fn summary(&self) -> LedgerResult<Summary> {
        match self.scope {
            LedgerScope::Personal => self.storage.ledger.summary(),
            LedgerScope::User(user_id) => self
                .storage
                .directory
                .summary(user_id)?
                .ok_or_else(|| LedgerError::user_not_found(user_id.to_string())),
        }
    }

    /// Snapshot of the whole ledger
    pub fn ledger(&self) -> LedgerResult<Ledger> {
        match self.scope {
            LedgerScope::Personal => self.storage.ledger.snapshot(),
            LedgerScope::User(user_id) => self
                .storage
                .directory
                .ledger(user_id)?
                .ok_or_else(|| LedgerError::user_not_found(user_id.to_string())),
        }
    }
}
