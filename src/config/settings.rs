//! User settings for finledger
//!
//! Stored as JSON in `config.json` under the base directory. A missing file
//! means defaults.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::paths::LedgerPaths;
use crate::error::LedgerError;

/// User settings for finledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Currency symbol used when rendering amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Whether creates and deletes are appended to the audit log
    #[serde(default = "default_audit_enabled")]
    pub audit_enabled: bool,

    /// Tracing filter used when `FINLEDGER_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_audit_enabled() -> bool {
    true
}

fn default_log_filter() -> String {
    "finledger=info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency(),
            audit_enabled: default_audit_enabled(),
            log_filter: default_log_filter(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                LedgerError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                LedgerError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            debug!(path = %settings_path.display(), "Loaded settings");
            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            debug!(path = %settings_path.display(), "No settings file, using defaults");
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LedgerPaths) -> Result<(), LedgerError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            LedgerError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            LedgerError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}
