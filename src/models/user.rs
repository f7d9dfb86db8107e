//! User model
//!
//! In the multi-user directory every user owns exactly one ledger, which
//! lives and dies with the user.

use chrono::{DateTime, Utc};

use super::ids::UserId;
use super::ledger::Ledger;

/// A named owner of a ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    /// Display name; not required to be unique or non-empty
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub ledger: Ledger,
}

impl User {
    /// Create a user with an empty ledger
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            created_at: Utc::now(),
            ledger: Ledger::for_owner(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_has_empty_owned_ledger() {
        let user = User::new(UserId::new(4), "Alice");
        assert_eq!(user.name, "Alice");
        assert!(user.ledger.is_empty());
        assert_eq!(user.ledger.owner(), Some(UserId::new(4)));
    }
}
