//! Durable storage for the cart. One record, overwritten wholesale on every save.

use std::{fs, io};

use camino::{Utf8Path, Utf8PathBuf};
use tracing::warn;

use super::LineItem;

pub const DEFAULT_SNAPSHOT_FILE: &str = "cart.json";

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Cart snapshot at {path} could not be accessed.")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Cart snapshot is not a valid list of line items.")]
    Serde(#[from] serde_json::Error),
}

pub trait CartSnapshot: Send + Sync {
    /// The stored items. A snapshot that was never written loads as an empty cart.
    fn load(&self) -> Result<Vec<LineItem>, SnapshotError>;

    fn save(&mut self, items: &[LineItem]) -> Result<(), SnapshotError>;
}

/// Keeps the serialized record in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryCartSnapshot {
    record: Option<String>,
}

impl MemoryCartSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: impl Into<String>) -> Self {
        MemoryCartSnapshot {
            record: Some(record.into()),
        }
    }

    pub fn record(&self) -> Option<&str> {
        self.record.as_deref()
    }
}

impl CartSnapshot for MemoryCartSnapshot {
    fn load(&self) -> Result<Vec<LineItem>, SnapshotError> {
        match &self.record {
            Some(record) => Ok(serde_json::from_str(record)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&mut self, items: &[LineItem]) -> Result<(), SnapshotError> {
        self.record = Some(serde_json::to_string(items)?);
        Ok(())
    }
}

/// A JSON file on disk. Writes go to a sibling temp file which is then renamed over the record.
#[derive(Debug, Clone)]
pub struct FileCartSnapshot {
    path: Utf8PathBuf,
}

impl Default for FileCartSnapshot {
    fn default() -> Self {
        FileCartSnapshot::new(DEFAULT_SNAPSHOT_FILE)
    }
}

impl FileCartSnapshot {
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        FileCartSnapshot { path: path.into() }
    }

    pub fn in_dir(dir: impl AsRef<Utf8Path>) -> Self {
        FileCartSnapshot::new(dir.as_ref().join(DEFAULT_SNAPSHOT_FILE))
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> SnapshotError {
        SnapshotError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl CartSnapshot for FileCartSnapshot {
    fn load(&self) -> Result<Vec<LineItem>, SnapshotError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(self.io_error(err)),
        }
    }

    fn save(&mut self, items: &[LineItem]) -> Result<(), SnapshotError> {
        let json = serde_json::to_vec_pretty(items)?;
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, json).map_err(|err| self.io_error(err))?;
        fs::rename(&temp_path, &self.path).map_err(|err| {
            if let Err(remove_err) = fs::remove_file(&temp_path) {
                warn!("Cart snapshot temp file {temp_path} could not be removed: {remove_err}");
            }
            self.io_error(err)
        })
    }
}
