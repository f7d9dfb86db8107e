//! Audit logging system for finledger
//!
//! Records every transaction and user creation or deletion in an append-only
//! line-delimited JSON log.
//!
//! - `AuditEntry`: one log entry with timestamp, operation, entity
//!   information and the entity's JSON.
//! - `AuditLogger`: appends entries to the log file and reads them back.

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
