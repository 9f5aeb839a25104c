//! Filesystem snapshot store
//!
//! Maps an opaque path to a persisted exchange record. Writes create all
//! missing intermediate directories and replace the file contents in one
//! operation. No locking: concurrent writers to the same path are not
//! serialized by this component.

use std::fs;
use std::path::Path;

use tracing::debug;

use super::SnapshotRecord;
use crate::{Result, SnapError};

/// Durable store for snapshot records
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotStore;

impl SnapshotStore {
    /// Create a store handle
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Check whether a record exists at the path
    #[must_use]
    pub fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    /// Read and parse the record at the path
    ///
    /// # Errors
    ///
    /// Returns [`SnapError::Io`] if the file cannot be read and
    /// [`SnapError::MalformedRecord`] if it cannot be parsed.
    pub fn read(&self, path: &Path) -> Result<SnapshotRecord> {
        let content = fs::read_to_string(path)?;

        serde_json::from_str(&content).map_err(|source| SnapError::MalformedRecord {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Serialize and write a record, overwriting any prior content
    ///
    /// Serialization is pretty-printed, stable-ordered JSON so re-recording
    /// an identical exchange produces byte-identical output.
    ///
    /// # Errors
    ///
    /// Returns error if directories cannot be created or the write fails;
    /// a failed write propagates rather than reporting a saved snapshot
    /// that was never persisted.
    pub fn write(&self, path: &Path, record: &SnapshotRecord) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let serialized = serde_json::to_string_pretty(record).map_err(SnapError::Serialize)?;
        fs::write(path, serialized)?;

        debug!("Wrote snapshot record: {}", path.display());
        Ok(())
    }
}
