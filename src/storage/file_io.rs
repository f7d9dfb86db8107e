//! File I/O utilities with atomic writes
//!
//! Reads treat a missing or unopenable file as "nothing stored yet". Writes go
//! to a sibling temp file that is synced and then renamed over the target.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info};

use crate::error::{LedgerError, LedgerResult};

/// Open a data file for reading
///
/// Returns `None` (logged at info level) when the file is missing or cannot
/// be opened; the caller then starts from an empty state.
pub fn open_data_file<P: AsRef<Path>>(path: P) -> Option<BufReader<File>> {
    let path = path.as_ref();

    match File::open(path) {
        Ok(file) => {
            debug!(path = %path.display(), "Opened data file");
            Some(BufReader::new(file))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "No existing data file found, starting fresh");
            None
        }
        Err(e) => {
            info!(path = %path.display(), error = %e, "Data file unreadable, starting fresh");
            None
        }
    }
}

/// Path of the temp file used while writing `path`
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name: OsString = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("data"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write a file atomically (write to temp, then rename)
///
/// The file is either completely replaced or left as it was.
pub fn write_atomic<P, F>(path: P, write: F) -> LedgerResult<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut BufWriter<File>) -> LedgerResult<()>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                LedgerError::Storage(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    // Temp file must be in the same directory for the rename to be atomic
    let temp_path = temp_path_for(path);

    let file = File::create(&temp_path)
        .map_err(|e| LedgerError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    if let Err(e) = write(&mut writer) {
        drop(writer);
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    writer
        .flush()
        .map_err(|e| LedgerError::Storage(format!("Failed to flush data: {}", e)))?;

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| LedgerError::Storage(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        LedgerError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    debug!(path = %path.display(), "Wrote data file");
    Ok(())
}

/// Copy a damaged data file aside so a later save can't destroy what's left
///
/// The copy is named `<file>.damaged-<UTC timestamp>` next to the original.
pub fn preserve_damaged<P: AsRef<Path>>(path: P) -> LedgerResult<PathBuf> {
    let path = path.as_ref();

    let mut name: OsString = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("data"));
    name.push(format!(".damaged-{}", Utc::now().format("%Y%m%dT%H%M%S%.3fZ")));
    let target = path.with_file_name(name);

    fs::copy(path, &target).map_err(|e| {
        LedgerError::Storage(format!(
            "Failed to copy damaged file {} to {}: {}",
            path.display(),
            target.display(),
            e
        ))
    })?;

    Ok(target)
}
