//! SQLite backend: one row per identity, atomic upsert via ON CONFLICT.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use crate::core::store::{CredentialBackend, StoreError};
use crate::models::identity::Identity;
use crate::models::record::{RecordSummary, StoredRecord};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS credentials (
    identity   TEXT PRIMARY KEY,
    label      TEXT,
    service    TEXT,
    username   TEXT,
    ciphertext TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
";

pub struct SqliteBackend {
    conn: Connection,
}

impl SqliteBackend {
    /// Open (or create) the database at `path` and ensure the schema
    /// exists. Safe to call on every invocation.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }
}

impl CredentialBackend for SqliteBackend {
    fn upsert(
        &self,
        identity: &Identity,
        ciphertext: &str,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO credentials (identity, label, service, username, ciphertext, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
             ON CONFLICT(identity) DO UPDATE SET
                 ciphertext = excluded.ciphertext,
                 updated_at = excluded.updated_at",
            params![
                identity.key(),
                identity.label(),
                identity.service(),
                identity.username(),
                ciphertext,
                now,
            ],
        )?;
        Ok(())
    }

    fn load(&self, identity: &Identity) -> Result<Option<StoredRecord>, StoreError> {
        let record = self
            .conn
            .query_row(
                "SELECT label, service, username, ciphertext, created_at, updated_at
                 FROM credentials WHERE identity = ?1",
                params![identity.key()],
                |row| {
                    Ok(StoredRecord {
                        label: row.get(0)?,
                        service: row.get(1)?,
                        username: row.get(2)?,
                        ciphertext: row.get(3)?,
                        created_at: row.get(4)?,
                        updated_at: row.get(5)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    fn list(&self) -> Result<Vec<RecordSummary>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT identity, label, service, username, created_at, updated_at
             FROM credentials ORDER BY updated_at DESC, identity ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, DateTime<Utc>>(4)?,
                row.get::<_, DateTime<Utc>>(5)?,
            ))
        })?;

        let mut summaries = Vec::new();
        for row in rows {
            let (key, label, service, username, created_at, updated_at) = row?;
            let identity = Identity::from_parts(label, service, username)
                .ok_or_else(|| StoreError::Corrupt(format!("row '{key}' has no identity")))?;
            summaries.push(RecordSummary {
                identity,
                created_at,
                updated_at,
            });
        }
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(name: &str) -> Identity {
        Identity::Label(name.into())
    }

    #[test]
    fn test_upsert_and_load() {
        let backend = SqliteBackend::open_in_memory().unwrap();
        backend.upsert(&label("a"), "tok", Utc::now()).unwrap();
        let record = backend.load(&label("a")).unwrap().unwrap();
        assert_eq!(record.ciphertext, "tok");
        assert_eq!(record.label.as_deref(), Some("a"));
    }

    #[test]
    fn test_upsert_is_single_row() {
        let backend = SqliteBackend::open_in_memory().unwrap();
        backend.upsert(&label("a"), "tok1", Utc::now()).unwrap();
        backend.upsert(&label("a"), "tok2", Utc::now()).unwrap();
        assert_eq!(backend.list().unwrap().len(), 1);
        assert_eq!(
            backend.load(&label("a")).unwrap().unwrap().ciphertext,
            "tok2"
        );
    }

    #[test]
    fn test_load_missing_is_none() {
        let backend = SqliteBackend::open_in_memory().unwrap();
        assert!(backend.load(&label("a")).unwrap().is_none());
    }

    #[test]
    fn test_timestamps_survive_roundtrip() {
        let backend = SqliteBackend::open_in_memory().unwrap();
        let now = Utc::now();
        backend.upsert(&label("a"), "tok", now).unwrap();
        let record = backend.load(&label("a")).unwrap().unwrap();
        assert_eq!(record.created_at, now);
        assert_eq!(record.updated_at, now);
    }

    #[test]
    fn test_login_columns_roundtrip() {
        let backend = SqliteBackend::open_in_memory().unwrap();
        let id = Identity::Login {
            service: "github".into(),
            username: "alice".into(),
        };
        backend.upsert(&id, "tok", Utc::now()).unwrap();
        let summaries = backend.list().unwrap();
        assert_eq!(summaries[0].identity, id);
    }

    #[test]
    fn test_schema_creation_is_idempotent() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("store.db");
        {
            let backend = SqliteBackend::open(&path).unwrap();
            backend.upsert(&label("a"), "tok", Utc::now()).unwrap();
        }
        let backend = SqliteBackend::open(&path).unwrap();
        assert_eq!(backend.list().unwrap().len(), 1);
    }
}
