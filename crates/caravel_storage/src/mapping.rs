//! Persistent cross-system identity mapping.

use crate::store::write_atomic;
use caravel_error::{CaravelResult, MappingError, MappingErrorKind};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

type EndpointTable = BTreeMap<String, BTreeMap<String, String>>;

/// Durable `(destination_endpoint, source_id) → destination_id` table.
///
/// Scoped per destination endpoint so one store file supports pushing the
/// same source data to several destination environments (staging,
/// production) without collision. Entries are append-only by design: there
/// is no delete operation, and the presence of an entry means "already
/// migrated". Every `set` is flushed durably before returning, so a crash
/// loses at most the in-flight item.
pub struct MappingStore {
    path: PathBuf,
    endpoint: String,
    data: EndpointTable,
}

impl MappingStore {
    /// Open the mapping table at `path`, scoped to `endpoint`. Creates an
    /// empty table when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>, endpoint: impl Into<String>) -> CaravelResult<Self> {
        let path = path.into();
        let endpoint = endpoint.into();
        let data: EndpointTable = if path.exists() {
            let body = fs::read(&path).map_err(|e| {
                MappingError::new(MappingErrorKind::Corrupt(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            })?;
            serde_json::from_slice(&body).map_err(|e| {
                MappingError::new(MappingErrorKind::Corrupt(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            })?
        } else {
            EndpointTable::new()
        };
        debug!(path = %path.display(), endpoint = %endpoint, "Opened mapping store");
        Ok(Self {
            path,
            endpoint,
            data,
        })
    }

    fn scope(&self) -> Option<&BTreeMap<String, String>> {
        self.data.get(&self.endpoint)
    }

    /// Whether a destination id has been recorded for this source id.
    pub fn contains(&self, source_id: &str) -> bool {
        self.scope().is_some_and(|s| s.contains_key(source_id))
    }

    /// The destination id recorded for this source id.
    pub fn get(&self, source_id: &str) -> CaravelResult<&str> {
        self.scope()
            .and_then(|s| s.get(source_id))
            .map(String::as_str)
            .ok_or_else(|| {
                MappingError::new(MappingErrorKind::NotFound(source_id.to_string())).into()
            })
    }

    /// Record a destination id for a source id and flush durably before
    /// returning.
    pub fn set(&mut self, source_id: &str, destination_id: &str) -> CaravelResult<()> {
        self.data
            .entry(self.endpoint.clone())
            .or_default()
            .insert(source_id.to_string(), destination_id.to_string());
        let body = serde_json::to_vec(&self.data).map_err(|e| {
            MappingError::new(MappingErrorKind::Persist(format!(
                "{}: {}",
                self.path.display(),
                e
            )))
        })?;
        write_atomic(&self.path, &body, true)?;
        info!(
            source_id = %source_id,
            destination_id = %destination_id,
            endpoint = %self.endpoint,
            "Recorded identity mapping"
        );
        Ok(())
    }
}
