//! Storage layer for finledger
//!
//! Provides the line-oriented file codec, atomic writes, the personal ledger
//! and user directory repositories, and the audit trail hook.

pub mod codec;
pub mod directory;
pub mod file_io;
pub mod ledger;

pub use codec::{Decoded, LoadedLedger, Recovery};
pub use directory::DirectoryRepository;
pub use file_io::{open_data_file, preserve_damaged, write_atomic};
pub use ledger::LedgerRepository;

use serde::Serialize;
use tracing::{debug, warn};

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::LedgerPaths;
use crate::error::LedgerError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: LedgerPaths,
    pub ledger: LedgerRepository,
    pub directory: DirectoryRepository,
    audit: Option<AuditLogger>,
}

impl Storage {
    /// Create a new Storage instance with auditing enabled
    ///
    /// Directories that cannot be created are only warned about: loading
    /// then starts empty and saves report their own failures.
    pub fn new(paths: LedgerPaths) -> Self {
        if let Err(e) = paths.ensure_directories() {
            warn!(
                base_dir = %paths.base_dir().display(),
                error = %e,
                "Could not create data directories, continuing without them"
            );
        }

        Self {
            ledger: LedgerRepository::new(paths.ledger_file()),
            directory: DirectoryRepository::new(paths.users_file()),
            audit: Some(AuditLogger::new(paths.audit_log())),
            paths,
        }
    }

    /// Turn the audit trail on or off
    pub fn with_audit(mut self, enabled: bool) -> Self {
        self.audit = enabled.then(|| AuditLogger::new(self.paths.audit_log()));
        self
    }

    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }

    /// The audit logger, if auditing is enabled
    pub fn audit(&self) -> Option<&AuditLogger> {
        self.audit.as_ref()
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), LedgerError> {
        self.ledger.load()?;
        self.directory.load()?;
        Ok(())
    }

    /// Write the user directory after a mutation
    ///
    /// A failed write is logged and otherwise ignored; the in-memory state
    /// stays authoritative for the rest of the run.
    pub fn persist_directory(&self) -> bool {
        match self.directory.save() {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    path = %self.directory.path().display(),
                    error = %e,
                    "Could not save user directory, changes from this run may be lost"
                );
                false
            }
        }
    }

    /// End-of-run save for the personal ledger
    ///
    /// Writes only if something changed. Failures are logged, not returned.
    pub fn shutdown(&self) -> bool {
        match self.ledger.is_dirty() {
            Ok(false) => {
                debug!("Personal ledger unchanged, nothing to save");
                true
            }
            Ok(true) => match self.ledger.save() {
                Ok(()) => true,
                Err(e) => {
                    warn!(
                        path = %self.ledger.path().display(),
                        error = %e,
                        "Could not save personal ledger, changes from this run are lost"
                    );
                    false
                }
            },
            Err(e) => {
                warn!(error = %e, "Could not inspect personal ledger state");
                false
            }
        }
    }

    /// Record a creation in the audit trail
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) {
        if let Some(audit) = &self.audit {
            let entry = AuditEntry::create(entity_type, entity_id, entity_name, entity);
            if let Err(e) = audit.log(&entry) {
                warn!(error = %e, "Could not write audit entry");
            }
        }
    }

    /// Record a deletion in the audit trail
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) {
        if let Some(audit) = &self.audit {
            let entry = AuditEntry::delete(entity_type, entity_id, entity_name, entity);
            if let Err(e) = audit.log(&entry) {
                warn!(error = %e, "Could not write audit entry");
            }
        }
    }
}
