//! Transaction model
//!
//! A transaction is an immutable record of money coming in or going out.
//! It is only ever created (with a freshly allocated ID) or deleted whole.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{IdAllocator, TransactionId};
use super::money::Money;

/// Whether a transaction adds to income or to expenses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expense"),
        }
    }
}

/// A single income or expense record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique, sequentially assigned identifier
    pub id: TransactionId,

    /// Income or expense
    pub kind: TransactionKind,

    /// Free-text category, stored verbatim
    pub category: String,

    /// Amount as entered; the sign is not checked
    pub amount: Money,

    /// When the transaction was recorded
    pub recorded_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a transaction, taking the next ID from `ids`
    ///
    /// Category and amount are stored as given: empty categories and
    /// negative amounts are accepted.
    pub fn create(
        ids: &mut IdAllocator<TransactionId>,
        kind: TransactionKind,
        category: impl Into<String>,
        amount: Money,
    ) -> Self {
        Self {
            id: ids.next_id(),
            kind,
            category: category.into(),
            amount,
            recorded_at: Utc::now(),
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.id, self.kind, self.category, self.amount
        )
    }
}
