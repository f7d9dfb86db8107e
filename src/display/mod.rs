//! Display formatting for terminal output
//!
//! Turns transactions, summaries and users into text for the CLI.

pub mod summary;
pub mod transaction;
pub mod user;

pub use summary::format_summary;
pub use transaction::{format_transaction_details, format_transaction_register};
pub use user::{format_user_details, format_user_list};
