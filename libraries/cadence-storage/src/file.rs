//! JSON file gateway
//!
//! Keeps every key in one JSON object. Each `set` rewrites the file through a
//! sibling temp file and a rename, so a crash mid-write leaves the previous
//! contents intact.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use cadence_core::PersistenceGateway;
use tracing::{debug, warn};

use crate::error::{Result, StorageError};

/// File-backed key/value store
#[derive(Debug)]
pub struct JsonFileGateway {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileGateway {
    /// Open (or lazily create) the store at `path`
    ///
    /// A missing file starts empty. An unreadable JSON document is logged and
    /// replaced on the next write rather than failing startup.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Discarding unreadable state file");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StorageError::Io(e)),
        };

        debug!(path = %path.display(), keys = entries.len(), "Opened state file");
        Ok(Self { path, entries })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl PersistenceGateway for JsonFileGateway {
    fn get(&self, key: &str) -> cadence_core::Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> cadence_core::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()?;
        Ok(())
    }
}
