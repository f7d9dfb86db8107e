//! Core data models for finledger
//!
//! Transactions, the ledgers that hold them, users and the directory of
//! users, plus the ID and money types they are built from.

pub mod directory;
pub mod ids;
pub mod ledger;
pub mod money;
pub mod transaction;
pub mod user;

pub use directory::UserDirectory;
pub use ids::{IdAllocator, SequentialId, TransactionId, UserId};
pub use ledger::{Ledger, Summary};
pub use money::{Money, MoneyParseError};
pub use transaction::{Transaction, TransactionKind};
pub use user::User;
