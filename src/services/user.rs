//! User service
//!
//! Creating, finding and listing users in the multi-user directory. Every
//! mutation is written to disk before returning.

use crate::audit::EntityType;
use crate::error::LedgerResult;
use crate::models::{Summary, User, UserId};
use crate::storage::Storage;

/// A user together with their ledger's headline numbers
#[derive(Debug, Clone)]
pub struct UserOverview {
    pub id: UserId,
    pub name: String,
    pub transaction_count: usize,
    pub summary: Summary,
}

impl UserOverview {
    fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            transaction_count: user.ledger.len(),
            summary: user.ledger.summary(),
        }
    }
}

/// Service for user management
pub struct UserService<'a> {
    storage: &'a Storage,
}

impl<'a> UserService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a user with an empty ledger and persist the directory
    ///
    /// Names are taken as given: empty and duplicate names are allowed.
    pub fn create_user(&self, name: &str) -> LedgerResult<User> {
        let user = self.storage.directory.create_user(name)?;
        self.storage.persist_directory();

        self.storage.log_create(
            EntityType::User,
            user.id.to_string(),
            Some(user.name.clone()),
            &serde_json::json!({ "id": user.id, "name": user.name }),
        );

        Ok(user)
    }

    /// Look a user up by ID; `None` if there is no such user
    pub fn get_user(&self, id: UserId) -> LedgerResult<Option<User>> {
        self.storage.directory.get_user(id)
    }

    /// `(id, name)` pairs in ascending ID order
    pub fn list_users(&self) -> LedgerResult<Vec<(UserId, String)>> {
        self.storage.directory.list_users()
    }

    /// Every user with transaction count and totals, in ascending ID order
    pub fn list_with_summaries(&self) -> LedgerResult<Vec<UserOverview>> {
        Ok(self
            .storage
            .directory
            .get_all()?
            .iter()
            .map(UserOverview::from_user)
            .collect())
    }

    pub fn overview(&self, id: UserId) -> LedgerResult<Option<UserOverview>> {
        Ok(self.get_user(id)?.as_ref().map(UserOverview::from_user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::models::Money;
    use crate::services::LedgerService;
    use crate::storage::DirectoryRepository;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths);
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_alice_and_bob() {
        let (_temp_dir, storage) = create_test_storage();
        let service = UserService::new(&storage);

        assert_eq!(service.create_user("Alice").unwrap().id, UserId::new(1));
        assert_eq!(service.create_user("Bob").unwrap().id, UserId::new(2));
        assert_eq!(
            service.get_user(UserId::new(1)).unwrap().unwrap().name,
            "Alice"
        );
        assert!(service.get_user(UserId::new(3)).unwrap().is_none());
    }

    #[test]
    fn test_create_user_writes_through() {
        let (_temp_dir, storage) = create_test_storage();
        let service = UserService::new(&storage);
        service.create_user("Alice").unwrap();

        let on_disk = DirectoryRepository::new(storage.paths().users_file());
        on_disk.load().unwrap();
        assert_eq!(
            on_disk.list_users().unwrap(),
            vec![(UserId::new(1), "Alice".to_string())]
        );
    }

    #[test]
    fn test_duplicate_and_empty_names_allowed() {
        let (_temp_dir, storage) = create_test_storage();
        let service = UserService::new(&storage);
        service.create_user("Sam").unwrap();
        service.create_user("Sam").unwrap();
        service.create_user("").unwrap();

        let users = service.list_users().unwrap();
        assert_eq!(users.len(), 3);
        assert_eq!(users[2], (UserId::new(3), String::new()));
    }

    #[test]
    fn test_overviews() {
        let (_temp_dir, storage) = create_test_storage();
        let service = UserService::new(&storage);
        let alice = service.create_user("Alice").unwrap();
        service.create_user("Bob").unwrap();

        let ledger = LedgerService::for_user(&storage, alice.id);
        ledger.add_income("Salary", Money::from_cents(5000)).unwrap();
        ledger.add_expense("Lunch", Money::from_cents(1250)).unwrap();

        let overviews = service.list_with_summaries().unwrap();
        assert_eq!(overviews.len(), 2);
        assert_eq!(overviews[0].transaction_count, 2);
        assert_eq!(overviews[0].summary.net, Money::from_cents(3750));
        assert_eq!(overviews[1].transaction_count, 0);

        assert!(service.overview(UserId::new(9)).unwrap().is_none());
    }
}
