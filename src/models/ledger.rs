//! Ledger model
//!
//! A ledger is one owner's transactions keyed by ID, plus running income and
//! expense totals. The totals are adjusted on every insert and delete rather
//! than recomputed, and they are what gets persisted, so every mutation has
//! to go through the methods here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ids::{IdAllocator, TransactionId, UserId};
use super::money::Money;
use super::transaction::{Transaction, TransactionKind};

/// Totals for a ledger at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_income: Money,
    pub total_expense: Money,
    pub net: Money,
}

impl Summary {
    pub fn new(total_income: Money, total_expense: Money) -> Self {
        Self {
            total_income,
            total_expense,
            net: total_income - total_expense,
        }
    }
}

/// One owner's transactions and running totals
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    owner: Option<UserId>,
    transactions: BTreeMap<TransactionId, Transaction>,
    total_income: Money,
    total_expense: Money,
}

impl Ledger {
    /// Create an empty ledger with no owner (the personal ledger)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty ledger belonging to a user
    pub fn for_owner(owner: UserId) -> Self {
        Self {
            owner: Some(owner),
            ..Self::default()
        }
    }

    /// Rebuild a ledger from persisted parts, trusting the given totals
    pub fn from_parts(
        owner: Option<UserId>,
        transactions: impl IntoIterator<Item = Transaction>,
        total_income: Money,
        total_expense: Money,
    ) -> Self {
        Self {
            owner,
            transactions: transactions.into_iter().map(|t| (t.id, t)).collect(),
            total_income,
            total_expense,
        }
    }

    pub fn owner(&self) -> Option<UserId> {
        self.owner
    }

    /// Record an income transaction
    pub fn add_income(
        &mut self,
        ids: &mut IdAllocator<TransactionId>,
        category: impl Into<String>,
        amount: Money,
    ) -> &Transaction {
        self.add(ids, TransactionKind::Income, category, amount)
    }

    /// Record an expense transaction
    pub fn add_expense(
        &mut self,
        ids: &mut IdAllocator<TransactionId>,
        category: impl Into<String>,
        amount: Money,
    ) -> &Transaction {
        self.add(ids, TransactionKind::Expense, category, amount)
    }

    /// Whether `amount` can be added to the matching total without overflow
    pub fn accepts(&self, kind: TransactionKind, amount: Money) -> bool {
        let total = match kind {
            TransactionKind::Income => self.total_income,
            TransactionKind::Expense => self.total_expense,
        };
        total.checked_add(amount).is_some()
    }

    /// Record a transaction of the given kind
    ///
    /// Totals saturate at the `Money` range; check [`Ledger::accepts`] first
    /// to refuse such amounts instead.
    pub fn add(
        &mut self,
        ids: &mut IdAllocator<TransactionId>,
        kind: TransactionKind,
        category: impl Into<String>,
        amount: Money,
    ) -> &Transaction {
        let txn = Transaction::create(ids, kind, category, amount);
        match kind {
            TransactionKind::Income => self.total_income += amount,
            TransactionKind::Expense => self.total_expense += amount,
        }
        self.transactions.entry(txn.id).or_insert(txn)
    }

    /// Remove a transaction, backing its amount out of the matching total
    ///
    /// Returns `None` and leaves the ledger untouched when the ID is absent.
    pub fn delete_transaction(&mut self, id: TransactionId) -> Option<Transaction> {
        let txn = self.transactions.remove(&id)?;
        match txn.kind {
            TransactionKind::Income => self.total_income -= txn.amount,
            TransactionKind::Expense => self.total_expense -= txn.amount,
        }
        Some(txn)
    }

    /// All transactions in ascending ID order
    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> + '_ {
        self.transactions.values()
    }

    /// Owned copy of all transactions in ascending ID order
    pub fn list_transactions(&self) -> Vec<Transaction> {
        self.transactions.values().cloned().collect()
    }

    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.get(&id)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn total_income(&self) -> Money {
        self.total_income
    }

    pub fn total_expense(&self) -> Money {
        self.total_expense
    }

    /// Current totals and net
    pub fn summary(&self) -> Summary {
        Summary::new(self.total_income, self.total_expense)
    }

    /// Highest transaction ID held, if any
    pub fn max_transaction_id(&self) -> Option<TransactionId> {
        self.transactions.keys().next_back().copied()
    }

    /// Totals summed from the records themselves
    pub fn recomputed_totals(&self) -> (Money, Money) {
        let income = self
            .transactions
            .values()
            .filter(|t| t.is_income())
            .map(|t| t.amount)
            .sum();
        let expense = self
            .transactions
            .values()
            .filter(|t| t.is_expense())
            .map(|t| t.amount)
            .sum();
        (income, expense)
    }

    /// Whether the running totals match the records
    pub fn totals_consistent(&self) -> bool {
        self.recomputed_totals() == (self.total_income, self.total_expense)
    }

    /// Replace the running totals with ones summed from the records
    pub fn recompute_totals(&mut self) {
        let (income, expense) = self.recomputed_totals();
        self.total_income = income;
        self.total_expense = expense;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cents(c: i64) -> Money {
        Money::from_cents(c)
    }

    #[test]
    fn test_salary_and_rent_summary() {
        let mut ids = IdAllocator::new();
        let mut ledger = Ledger::new();

        let salary_id = ledger.add_income(&mut ids, "Salary", cents(100000)).id;
        ledger.add_expense(&mut ids, "Rent", cents(40000));

        assert_eq!(
            ledger.summary(),
            Summary {
                total_income: cents(100000),
                total_expense: cents(40000),
                net: cents(60000),
            }
        );

        ledger.delete_transaction(salary_id);

        let summary = ledger.summary();
        assert_eq!(summary.total_income, cents(0));
        assert_eq!(summary.total_expense, cents(40000));
        assert_eq!(summary.net, cents(-40000));
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let mut ids = IdAllocator::new();
        let mut ledger = Ledger::new();
        ledger.add_income(&mut ids, "Salary", cents(5000));
        let before = ledger.clone();

        assert!(ledger.delete_transaction(TransactionId::new(99)).is_none());
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let mut ids = IdAllocator::new();
        let mut ledger = Ledger::new();

        let a = ledger.add_income(&mut ids, "A", cents(1)).id;
        let b = ledger.add_expense(&mut ids, "B", cents(1)).id;
        ledger.delete_transaction(b);
        let c = ledger.add_expense(&mut ids, "C", cents(1)).id;

        assert!(a < b && b < c);
        assert_eq!(c, TransactionId::new(3));
    }

    #[test]
    fn test_list_is_ascending_and_repeatable() {
        let mut ids = IdAllocator::resuming_after(7);
        let mut ledger = Ledger::new();
        ledger.add_expense(&mut ids, "Coffee", cents(350));
        ledger.add_income(&mut ids, "Refund", cents(1200));
        ledger.add_expense(&mut ids, "Lunch", cents(990));

        let first = ledger.list_transactions();
        let second = ledger.list_transactions();
        let listed: Vec<u64> = first.iter().map(|t| t.id.get()).collect();

        assert_eq!(listed, vec![8, 9, 10]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_net_tracks_mixed_sequence() {
        let mut ids = IdAllocator::new();
        let mut ledger = Ledger::new();
        let mut present = Vec::new();

        for i in 0..20i64 {
            let txn = if i % 3 == 0 {
                ledger.add_expense(&mut ids, "E", cents(i * 37 + 5)).clone()
            } else {
                ledger.add_income(&mut ids, "I", cents(i * 101 - 40)).clone()
            };
            present.push(txn);
            if i % 4 == 0 {
                let victim = present.remove(0);
                ledger.delete_transaction(victim.id);
            }
        }

        let income: Money = present.iter().filter(|t| t.is_income()).map(|t| t.amount).sum();
        let expense: Money = present.iter().filter(|t| t.is_expense()).map(|t| t.amount).sum();

        assert_eq!(ledger.summary().net, income - expense);
        assert!(ledger.totals_consistent());
    }

    #[test]
    fn test_negative_amounts_accepted() {
        let mut ids = IdAllocator::new();
        let mut ledger = Ledger::new();
        ledger.add_income(&mut ids, "", cents(-500));

        assert_eq!(ledger.total_income(), cents(-500));
        assert_eq!(ledger.summary().net, cents(-500));
    }

    #[test]
    fn test_accepts_rejects_overflowing_total() {
        let mut ids = IdAllocator::new();
        let mut ledger = Ledger::new();
        let big = cents(i64::MAX / 2 + 1);

        assert!(ledger.accepts(TransactionKind::Income, big));
        ledger.add_income(&mut ids, "A", big);
        assert!(!ledger.accepts(TransactionKind::Income, big));
        assert!(ledger.accepts(TransactionKind::Expense, big));
    }

    #[test]
    fn test_recompute_totals_repairs_drift() {
        let mut ids = IdAllocator::new();
        let txn = Transaction::create(&mut ids, TransactionKind::Income, "Gift", cents(2500));
        let mut ledger = Ledger::from_parts(None, vec![txn], cents(9999), cents(1));

        assert!(!ledger.totals_consistent());
        ledger.recompute_totals();
        assert_eq!(ledger.summary(), Summary::new(cents(2500), cents(0)));
    }

    #[test]
    fn test_max_transaction_id() {
        let mut ids = IdAllocator::new();
        let mut ledger = Ledger::for_owner(UserId::new(1));
        assert_eq!(ledger.max_transaction_id(), None);

        ledger.add_income(&mut ids, "A", cents(1));
        ledger.add_income(&mut ids, "B", cents(1));
        assert_eq!(ledger.max_transaction_id(), Some(TransactionId::new(2)));
        assert_eq!(ledger.owner(), Some(UserId::new(1)));
    }
}
