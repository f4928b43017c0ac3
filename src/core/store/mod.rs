//! Credential store: one interface, pluggable persistence backends.
//!
//! `CredentialStore` owns the encryption boundary. Plaintext passwords
//! enter at `save` and leave at `get`; backends only ever see ciphertext
//! tokens. Which backend holds the records is a configuration choice.

use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::core::cipher::{self, CipherError};
use crate::core::keyfile::{self, KeyError};
use crate::core::paths::ForgePaths;
use crate::models::config::BackendKind;
use crate::models::identity::Identity;
use crate::models::record::{RecordSummary, StoredRecord};

pub mod json;
pub mod sqlite;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("read store: {0}")]
    Read(#[source] std::io::Error),

    #[error("write store: {0}")]
    Write(#[source] std::io::Error),

    #[error("store data corrupt: {0}")]
    Corrupt(String),

    #[error("database: {0}")]
    Database(#[from] rusqlite::Error),

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Cipher(#[from] CipherError),
}

/// Persistence operations a backend must provide. Backends store and
/// return ciphertext tokens; they never handle plaintext.
pub trait CredentialBackend {
    /// Insert or update the record for `identity`. On update only the
    /// ciphertext and `updated_at` change; `created_at` is immutable.
    /// Atomic with respect to concurrent processes.
    fn upsert(
        &self,
        identity: &Identity,
        ciphertext: &str,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Look up the record for `identity`. `Ok(None)` means no such entry.
    fn load(&self, identity: &Identity) -> Result<Option<StoredRecord>, StoreError>;

    /// Every record's identity and timestamps, most recently updated
    /// first. Empty when the store has no records or does not yet exist.
    fn list(&self) -> Result<Vec<RecordSummary>, StoreError>;
}

/// A credential record with its decrypted password, as returned by `get`.
#[derive(Debug)]
pub struct Credential {
    pub identity: Identity,
    pub password: Zeroizing<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct CredentialStore {
    backend: Box<dyn CredentialBackend>,
    key_path: PathBuf,
}

impl CredentialStore {
    /// Open the store at `paths` with the configured backend, creating the
    /// root directory if needed.
    pub fn open(paths: &ForgePaths, backend: BackendKind) -> Result<Self, StoreError> {
        ensure_root(&paths.root)?;
        let backend: Box<dyn CredentialBackend> = match backend {
            BackendKind::Json => Box::new(json::JsonBackend::new(
                paths.store_json.clone(),
                paths.store_lock.clone(),
            )),
            BackendKind::Sqlite => Box::new(sqlite::SqliteBackend::open(&paths.store_db)?),
        };
        Ok(Self {
            backend,
            key_path: paths.key_file.clone(),
        })
    }

    /// Build a store from an explicit backend. Used by tests.
    #[cfg(test)]
    pub fn with_backend(backend: Box<dyn CredentialBackend>, key_path: PathBuf) -> Self {
        Self { backend, key_path }
    }

    /// Encrypt `plaintext` and upsert it under `identity`.
    pub fn save(&self, identity: &Identity, plaintext: &str) -> Result<(), StoreError> {
        let key = keyfile::get_or_create_key(&self.key_path)?;
        let token = cipher::encrypt(plaintext, &key)?;
        self.backend.upsert(identity, &token, Utc::now())
    }

    /// Look up `identity` and decrypt its password. `Ok(None)` when the
    /// identity was never saved.
    pub fn get(&self, identity: &Identity) -> Result<Option<Credential>, StoreError> {
        let Some(record) = self.backend.load(identity)? else {
            return Ok(None);
        };
        let key = keyfile::get_or_create_key(&self.key_path)?;
        let password = cipher::decrypt(&record.ciphertext, &key)?;
        Ok(Some(Credential {
            identity: identity.clone(),
            password,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }))
    }

    /// Identity and timestamp metadata for every record, never password
    /// material.
    pub fn list(&self) -> Result<Vec<RecordSummary>, StoreError> {
        self.backend.list()
    }
}

fn ensure_root(root: &Path) -> Result<(), StoreError> {
    if !root.exists() {
        fs::create_dir_all(root).map_err(StoreError::Write)?;
        #[cfg(unix)]
        {
            let perm = fs::Permissions::from_mode(crate::constants::STORE_DIR_MODE);
            fs::set_permissions(root, perm).map_err(StoreError::Write)?;
        }
    }
    Ok(())
}
