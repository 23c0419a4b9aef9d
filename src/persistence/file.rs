//! JSON snapshot files.

use std::fs::File;
use std::io::{ErrorKind, Write};
use std::path::Path;

use super::models::StoreSnapshot;
use crate::error::TrackerError;

/// Reads a snapshot from `path`.
///
/// Returns `Ok(None)` if the file does not exist yet.
///
/// # Errors
///
/// Returns [`TrackerError::Persistence`] on I/O failure and
/// [`TrackerError::Serialization`] if the file is not a valid snapshot.
pub fn load_snapshot(path: &Path) -> Result<Option<StoreSnapshot>, TrackerError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(TrackerError::Persistence(format!(
                "reading {}: {e}",
                path.display()
            )));
        }
    };
    let snapshot = serde_json::from_slice(&bytes)?;
    Ok(Some(snapshot))
}

/// Writes `snapshot` to `path`.
///
/// The data goes to a sibling temporary file, is synced to disk, and is
/// then renamed into place, so `path` holds either the old or the new
/// snapshot.
///
/// # Errors
///
/// Returns [`TrackerError::Persistence`] on I/O failure.
pub fn save_snapshot(path: &Path, snapshot: &StoreSnapshot) -> Result<(), TrackerError> {
    let json = serde_json::to_vec_pretty(snapshot)?;
    let tmp = path.with_extension("json.tmp");
    let write_err = |e: std::io::Error| {
        TrackerError::Persistence(format!("writing {}: {e}", tmp.display()))
    };
    let mut file = File::create(&tmp).map_err(write_err)?;
    file.write_all(&json).map_err(write_err)?;
    file.sync_all().map_err(write_err)?;
    drop(file);
    std::fs::rename(&tmp, path)
        .map_err(|e| TrackerError::Persistence(format!("replacing {}: {e}", path.display())))?;
    tracing::debug!(path = %path.display(), entries = snapshot.entries.len(), "snapshot saved");
    Ok(())
}
