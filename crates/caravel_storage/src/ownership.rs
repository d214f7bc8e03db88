//! Auxiliary video-ownership table.

use crate::store::write_atomic;
use caravel_error::{CaravelResult, StorageError, StorageErrorKind};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// `source_video_id → destination_username` table.
///
/// Written whole by the offline ownership resolver, read whole by the push
/// pipeline. Absence of the file means no video has a resolved owner.
pub struct OwnershipTable {
    path: PathBuf,
    data: BTreeMap<String, String>,
}

impl OwnershipTable {
    /// Load the table at `path`, or an empty one when the file is absent.
    pub fn load(path: impl Into<PathBuf>) -> CaravelResult<Self> {
        let path = path.into();
        let data = if path.exists() {
            let body = fs::read(&path).map_err(|e| {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            })?;
            serde_json::from_slice(&body).map_err(|e| {
                StorageError::new(StorageErrorKind::InvalidRecord(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            })?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, data })
    }

    /// Username recorded as owner of a video, if any.
    pub fn owner(&self, video_id: &str) -> Option<&str> {
        self.data.get(video_id).map(String::as_str)
    }

    /// Record an owner for a video. Not persisted until [`Self::write`].
    pub fn insert(&mut self, video_id: impl Into<String>, username: impl Into<String>) {
        self.data.insert(video_id.into(), username.into());
    }

    /// Number of resolved entries.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Persist the whole table atomically.
    pub fn write(&self) -> CaravelResult<()> {
        let body = serde_json::to_vec(&self.data).map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                self.path.display(),
                e
            )))
        })?;
        write_atomic(&self.path, &body, false)
    }
}
