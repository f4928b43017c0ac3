//! Identity under which a credential record is stored.

use std::fmt;

/// The unique key of a credential record: either a free-form label or a
/// service+username pair, depending on how the caller addresses records.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    Label(String),
    Login { service: String, username: String },
}

impl Identity {
    /// Canonical key string, unique per identity within a store.
    ///
    /// The shape prefix keeps a label from colliding with a login, and the
    /// unit separator keeps `("a", "b/c")` distinct from `("a/b", "c")`.
    pub fn key(&self) -> String {
        match self {
            Identity::Label(label) => format!("label:{label}"),
            Identity::Login { service, username } => {
                format!("login:{service}\u{1f}{username}")
            }
        }
    }

    /// Rebuild an identity from stored columns. Returns `None` when the
    /// columns describe neither shape (corrupt record).
    pub fn from_parts(
        label: Option<String>,
        service: Option<String>,
        username: Option<String>,
    ) -> Option<Self> {
        match (label, service, username) {
            (Some(label), None, None) => Some(Identity::Label(label)),
            (None, Some(service), Some(username)) => Some(Identity::Login { service, username }),
            _ => None,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Identity::Label(label) => Some(label),
            Identity::Login { .. } => None,
        }
    }

    pub fn service(&self) -> Option<&str> {
        match self {
            Identity::Label(_) => None,
            Identity::Login { service, .. } => Some(service),
        }
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Identity::Label(_) => None,
            Identity::Login { username, .. } => Some(username),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::Label(label) => write!(f, "{label}"),
            Identity::Login { service, username } => {
                write!(f, "{service} (user: {username})")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_distinguishes_shapes() {
        let label = Identity::Label("github".into());
        let login = Identity::Login {
            service: "github".into(),
            username: "alice".into(),
        };
        assert_ne!(label.key(), login.key());
    }

    #[test]
    fn test_key_separator_prevents_collisions() {
        let a = Identity::Login {
            service: "a".into(),
            username: "b/c".into(),
        };
        let b = Identity::Login {
            service: "a/b".into(),
            username: "c".into(),
        };
        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn test_from_parts_label() {
        let id = Identity::from_parts(Some("mail".into()), None, None).unwrap();
        assert_eq!(id, Identity::Label("mail".into()));
    }

    #[test]
    fn test_from_parts_login() {
        let id = Identity::from_parts(None, Some("mail".into()), Some("bob".into())).unwrap();
        assert_eq!(
            id,
            Identity::Login {
                service: "mail".into(),
                username: "bob".into()
            }
        );
    }

    #[test]
    fn test_from_parts_rejects_mixed_columns() {
        assert!(Identity::from_parts(Some("x".into()), Some("y".into()), None).is_none());
        assert!(Identity::from_parts(None, Some("y".into()), None).is_none());
        assert!(Identity::from_parts(None, None, None).is_none());
    }

    #[test]
    fn test_display() {
        let login = Identity::Login {
            service: "github".into(),
            username: "alice".into(),
        };
        assert_eq!(login.to_string(), "github (user: alice)");
        assert_eq!(Identity::Label("mail".into()).to_string(), "mail");
    }
}
