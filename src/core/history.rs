//! Session history: a JSON array of session records on disk
//!
//! A missing file is an empty history. Writes go through a temp file and a
//! rename so a crash mid-write leaves the previous history intact.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::HistoryError;
use crate::types::SessionRecord;

/// File-backed list of finished sessions
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
    records: Vec<SessionRecord>,
}

impl SessionStore {
    /// Open the store, reading existing records if the file exists
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HistoryError> {
        let path = path.as_ref().to_path_buf();
        let records = if path.exists() {
            let json = std::fs::read_to_string(&path).map_err(|source| HistoryError::Storage {
                path: path.display().to_string(),
                source,
            })?;
            if json.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&json).map_err(|source| HistoryError::Serialize {
                    path: path.display().to_string(),
                    source,
                })?
            }
        } else {
            Vec::new()
        };
        debug!(path = %path.display(), count = records.len(), "session history loaded");
        Ok(Self { path, records })
    }

    /// Add a record and persist the whole history.
    ///
    /// The in-memory list only changes once the file has been written.
    pub fn append(&mut self, record: SessionRecord) -> Result<(), HistoryError> {
        let mut records = self.records.clone();
        records.push(record);
        self.save(&records)?;
        self.records = records;
        info!(path = %self.path.display(), count = self.records.len(), "session saved");
        Ok(())
    }

    fn save(&self, records: &[SessionRecord]) -> Result<(), HistoryError> {
        let display = self.path.display().to_string();
        let json = serde_json::to_string_pretty(records).map_err(|source| {
            HistoryError::Serialize { path: display.clone(), source }
        })?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| HistoryError::Storage {
                path: display.clone(),
                source,
            })?;
        }

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .and_then(|_| std::fs::rename(&tmp, &self.path))
            .map_err(|source| HistoryError::Storage { path: display, source })
    }

    pub fn records(&self) -> &[SessionRecord] {
        &self.records
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reps across all stored sessions
    pub fn total_reps(&self) -> u64 {
        self.records.iter().map(|r| r.reps as u64).sum()
    }
}
