use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::identity::Identity;

/// A credential record as persisted by a store backend.
///
/// Exactly one identity shape is populated: `label`, or `service` plus
/// `username`. The password only ever appears here as a ciphertext token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub ciphertext: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredRecord {
    pub fn new(identity: &Identity, ciphertext: String, now: DateTime<Utc>) -> Self {
        Self {
            label: identity.label().map(str::to_string),
            service: identity.service().map(str::to_string),
            username: identity.username().map(str::to_string),
            ciphertext,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn identity(&self) -> Option<Identity> {
        Identity::from_parts(
            self.label.clone(),
            self.service.clone(),
            self.username.clone(),
        )
    }
}

/// Metadata returned by `list`: identity and timestamps, nothing else.
/// Password material (plaintext or ciphertext) is deliberately absent.
#[derive(Debug, Clone)]
pub struct RecordSummary {
    pub identity: Identity,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_populates_one_identity_shape() {
        let now = Utc::now();
        let rec = StoredRecord::new(&Identity::Label("mail".into()), "tok".into(), now);
        assert_eq!(rec.label.as_deref(), Some("mail"));
        assert!(rec.service.is_none());
        assert!(rec.username.is_none());
        assert_eq!(rec.created_at, now);
        assert_eq!(rec.updated_at, now);
    }

    #[test]
    fn test_identity_roundtrip() {
        let id = Identity::Login {
            service: "github".into(),
            username: "alice".into(),
        };
        let rec = StoredRecord::new(&id, "tok".into(), Utc::now());
        assert_eq!(rec.identity(), Some(id));
    }
}
