//! JSON file backend: one document mapping identity key to record.
//!
//! Every mutation takes the store lock, re-reads the document, applies the
//! change, and replaces the file atomically. A concurrent save can
//! therefore never leave the document half-written or drop a record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::constants;
use crate::core::file_lock::FileLock;
use crate::core::store::{CredentialBackend, StoreError};
use crate::models::identity::Identity;
use crate::models::record::{RecordSummary, StoredRecord};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    records: BTreeMap<String, StoredRecord>,
}

impl Default for StoreFile {
    fn default() -> Self {
        Self {
            version: default_version(),
            records: BTreeMap::new(),
        }
    }
}

fn default_version() -> u32 {
    1
}

pub struct JsonBackend {
    path: PathBuf,
    lock_path: PathBuf,
}

impl JsonBackend {
    pub fn new(path: PathBuf, lock_path: PathBuf) -> Self {
        Self { path, lock_path }
    }

    fn load_file(&self) -> Result<StoreFile, StoreError> {
        if !self.path.exists() {
            return Ok(StoreFile::default());
        }
        let content = fs::read_to_string(&self.path).map_err(StoreError::Read)?;
        serde_json::from_str(&content)
            .map_err(|e| StoreError::Corrupt(format!("{}: {e}", self.path.display())))
    }

    fn write_file(&self, store: &StoreFile) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(store)
            .map_err(|e| StoreError::Corrupt(format!("serialize store: {e}")))?;
        let parent = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(StoreError::Write)?;
        tmp.write_all(content.as_bytes()).map_err(StoreError::Write)?;
        tmp.flush().map_err(StoreError::Write)?;

        #[cfg(unix)]
        {
            let perm = fs::Permissions::from_mode(constants::SECRET_FILE_MODE);
            tmp.as_file().set_permissions(perm).map_err(StoreError::Write)?;
        }

        tmp.persist(&self.path).map_err(|e| StoreError::Write(e.error))?;
        Ok(())
    }
}

impl CredentialBackend for JsonBackend {
    fn upsert(
        &self,
        identity: &Identity,
        ciphertext: &str,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let _lock = FileLock::exclusive(&self.lock_path).map_err(StoreError::Write)?;
        let mut store = self.load_file()?;
        match store.records.get_mut(&identity.key()) {
            Some(existing) => {
                existing.ciphertext = ciphertext.to_string();
                existing.updated_at = now;
            }
            None => {
                store.records.insert(
                    identity.key(),
                    StoredRecord::new(identity, ciphertext.to_string(), now),
                );
            }
        }
        self.write_file(&store)
    }

    fn load(&self, identity: &Identity) -> Result<Option<StoredRecord>, StoreError> {
        let store = self.load_file()?;
        Ok(store.records.get(&identity.key()).cloned())
    }

    fn list(&self) -> Result<Vec<RecordSummary>, StoreError> {
        let store = self.load_file()?;
        let mut summaries = Vec::with_capacity(store.records.len());
        for (key, record) in &store.records {
            let identity = record
                .identity()
                .ok_or_else(|| StoreError::Corrupt(format!("record '{key}' has no identity")))?;
            summaries.push(RecordSummary {
                identity,
                created_at: record.created_at,
                updated_at: record.updated_at,
            });
        }
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }
}
