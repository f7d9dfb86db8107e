//! Business logic layer for finledger
//!
//! Services sit between the CLI and storage: they route operations to the
//! right ledger, apply the save cadence, and write the audit trail.

pub mod ledger;
pub mod user;

pub use ledger::{LedgerScope, LedgerService};
pub use user::{UserOverview, UserService};
