//! User directory model
//!
//! Maps user IDs to users for the multi-user variant. The directory owns both
//! ID allocators: one for users and one for transactions shared by every
//! user's ledger, so transaction IDs are unique across the whole directory.

use std::collections::BTreeMap;

use super::ids::{IdAllocator, TransactionId, UserId};
use super::ledger::{Ledger, Summary};
use super::money::Money;
use super::transaction::{Transaction, TransactionKind};
use super::user::User;

/// All users and their ledgers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDirectory {
    users: BTreeMap<UserId, User>,
    user_ids: IdAllocator<UserId>,
    transaction_ids: IdAllocator<TransactionId>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a directory from persisted users
    ///
    /// Both allocators resume above the larger of the persisted high-water
    /// mark and the highest ID actually present.
    pub fn from_parts(
        users: impl IntoIterator<Item = User>,
        last_user_id: u64,
        last_transaction_id: u64,
    ) -> Self {
        let users: BTreeMap<UserId, User> = users.into_iter().map(|u| (u.id, u)).collect();

        let mut user_ids = IdAllocator::resuming_after(last_user_id);
        let mut transaction_ids = IdAllocator::resuming_after(last_transaction_id);
        for user in users.values() {
            user_ids.observe(user.id);
            if let Some(max) = user.ledger.max_transaction_id() {
                transaction_ids.observe(max);
            }
        }

        Self {
            users,
            user_ids,
            transaction_ids,
        }
    }

    /// Register a new user with an empty ledger
    pub fn create_user(&mut self, name: impl Into<String>) -> &User {
        let user = User::new(self.user_ids.next_id(), name);
        self.users.entry(user.id).or_insert(user)
    }

    pub fn get_user(&self, id: UserId) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn get_user_mut(&mut self, id: UserId) -> Option<&mut User> {
        self.users.get_mut(&id)
    }

    /// `(id, name)` pairs in ascending ID order
    pub fn list_users(&self) -> Vec<(UserId, String)> {
        self.users
            .values()
            .map(|u| (u.id, u.name.clone()))
            .collect()
    }

    /// All users in ascending ID order
    pub fn users(&self) -> impl Iterator<Item = &User> + '_ {
        self.users.values()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn last_user_id(&self) -> u64 {
        self.user_ids.last_issued()
    }

    pub fn last_transaction_id(&self) -> u64 {
        self.transaction_ids.last_issued()
    }

    /// Record a transaction in a user's ledger
    ///
    /// Returns `None` when the user does not exist; no ID is consumed then.
    pub fn add_transaction(
        &mut self,
        user_id: UserId,
        kind: TransactionKind,
        category: impl Into<String>,
        amount: Money,
    ) -> Option<Transaction> {
        let user = self.users.get_mut(&user_id)?;
        let txn = user
            .ledger
            .add(&mut self.transaction_ids, kind, category, amount)
            .clone();
        Some(txn)
    }

    /// Delete a transaction from a user's ledger
    ///
    /// The outer `None` means the user is missing; the inner one means the
    /// transaction was not in that user's ledger.
    pub fn delete_transaction(
        &mut self,
        user_id: UserId,
        id: TransactionId,
    ) -> Option<Option<Transaction>> {
        let user = self.users.get_mut(&user_id)?;
        Some(user.ledger.delete_transaction(id))
    }

    pub fn ledger(&self, user_id: UserId) -> Option<&Ledger> {
        self.users.get(&user_id).map(|u| &u.ledger)
    }

    pub fn summary(&self, user_id: UserId) -> Option<Summary> {
        self.ledger(user_id).map(Ledger::summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_lookup_users() {
        let mut dir = UserDirectory::new();
        assert_eq!(dir.create_user("Alice").id, UserId::new(1));
        assert_eq!(dir.create_user("Bob").id, UserId::new(2));

        assert_eq!(dir.get_user(UserId::new(1)).unwrap().name, "Alice");
        assert!(dir.get_user(UserId::new(3)).is_none());
    }

    #[test]
    fn test_list_users_ascending() {
        let mut dir = UserDirectory::new();
        dir.create_user("Carol");
        dir.create_user("Alice");
        dir.create_user("");

        let listed = dir.list_users();
        assert_eq!(
            listed,
            vec![
                (UserId::new(1), "Carol".to_string()),
                (UserId::new(2), "Alice".to_string()),
                (UserId::new(3), String::new()),
            ]
        );
    }

    #[test]
    fn test_transaction_ids_shared_across_users() {
        let mut dir = UserDirectory::new();
        let alice = dir.create_user("Alice").id;
        let bob = dir.create_user("Bob").id;

        let a = dir
            .add_transaction(alice, TransactionKind::Income, "Salary", Money::from_cents(500))
            .unwrap();
        let b = dir
            .add_transaction(bob, TransactionKind::Expense, "Rent", Money::from_cents(300))
            .unwrap();

        assert_eq!(a.id, TransactionId::new(1));
        assert_eq!(b.id, TransactionId::new(2));
        assert_eq!(dir.summary(bob).unwrap().net, Money::from_cents(-300));
    }

    #[test]
    fn test_operations_on_missing_user() {
        let mut dir = UserDirectory::new();
        assert!(dir
            .add_transaction(UserId::new(9), TransactionKind::Income, "X", Money::zero())
            .is_none());
        assert!(dir
            .delete_transaction(UserId::new(9), TransactionId::new(1))
            .is_none());
        assert!(dir.summary(UserId::new(9)).is_none());
        assert_eq!(dir.last_transaction_id(), 0);
    }

    #[test]
    fn test_delete_only_touches_owner_ledger() {
        let mut dir = UserDirectory::new();
        let alice = dir.create_user("Alice").id;
        let bob = dir.create_user("Bob").id;
        let txn = dir
            .add_transaction(alice, TransactionKind::Income, "Salary", Money::from_cents(500))
            .unwrap();

        assert_eq!(dir.delete_transaction(bob, txn.id), Some(None));
        assert_eq!(dir.ledger(alice).unwrap().len(), 1);

        let removed = dir.delete_transaction(alice, txn.id).unwrap().unwrap();
        assert_eq!(removed.id, txn.id);
        assert!(dir.ledger(alice).unwrap().is_empty());
    }

    #[test]
    fn test_from_parts_resumes_allocators() {
        let mut ids = IdAllocator::resuming_after(40);
        let mut user = User::new(UserId::new(5), "Dana");
        user.ledger.add_income(&mut ids, "Bonus", Money::from_cents(100));

        let mut dir = UserDirectory::from_parts(vec![user], 2, 12);
        assert_eq!(dir.create_user("Eve").id, UserId::new(6));

        let eve = UserId::new(6);
        let txn = dir
            .add_transaction(eve, TransactionKind::Expense, "Food", Money::from_cents(10))
            .unwrap();
        assert_eq!(txn.id, TransactionId::new(42));
    }
}
