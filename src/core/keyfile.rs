//! Encryption key lifecycle: read an existing key or create one atomically.
//!
//! The key is a long-lived secret; losing it makes every stored ciphertext
//! permanently unrecoverable. There is no rotation path.

use rand::rngs::OsRng;
use rand::RngCore;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::constants;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("key file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("key file {path}: expected {expected} bytes, found {found}")]
    BadLength {
        path: PathBuf,
        expected: usize,
        found: usize,
    },
}

/// Read the key at `path`, or generate and persist a fresh one.
///
/// Repeated calls return bit-identical keys. First-time creation uses
/// `create_new`, so two processes bootstrapping the same store cannot end
/// up with different keys: the loser of the create race reads the winner's
/// file.
pub fn get_or_create_key(path: &Path) -> Result<Zeroizing<Vec<u8>>, KeyError> {
    if let Some(key) = read_key(path)? {
        return Ok(key);
    }

    let mut key = Zeroizing::new(vec![0u8; constants::KEY_LEN]);
    OsRng.fill_bytes(&mut key);

    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(mut file) => {
            #[cfg(unix)]
            {
                let perm = fs::Permissions::from_mode(constants::SECRET_FILE_MODE);
                file.set_permissions(perm).map_err(|source| KeyError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
            }
            file.write_all(&key).map_err(|source| KeyError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            file.sync_all().map_err(|source| KeyError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(key)
        }
        // Another process created the key between our read and create.
        Err(e) if e.kind() == ErrorKind::AlreadyExists => match read_key(path)? {
            Some(key) => Ok(key),
            None => Err(KeyError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(ErrorKind::NotFound, "key file vanished"),
            }),
        },
        Err(source) => Err(KeyError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn read_key(path: &Path) -> Result<Option<Zeroizing<Vec<u8>>>, KeyError> {
    match fs::read(path) {
        Ok(bytes) => {
            if bytes.len() != constants::KEY_LEN {
                return Err(KeyError::BadLength {
                    path: path.to_path_buf(),
                    expected: constants::KEY_LEN,
                    found: bytes.len(),
                });
            }
            Ok(Some(Zeroizing::new(bytes)))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(KeyError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_creates_key_on_first_call() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secret.key");
        let key = get_or_create_key(&path).unwrap();
        assert_eq!(key.len(), constants::KEY_LEN);
        assert!(path.is_file());
    }

    #[test]
    fn test_idempotent_across_calls() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secret.key");
        let first = get_or_create_key(&path).unwrap();
        let second = get_or_create_key(&path).unwrap();
        assert_eq!(*first, *second);
    }

    #[test]
    fn test_rejects_truncated_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secret.key");
        fs::write(&path, b"short").unwrap();
        let err = get_or_create_key(&path).unwrap_err();
        assert!(matches!(err, KeyError::BadLength { found: 5, .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_key_file_mode() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secret.key");
        get_or_create_key(&path).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, constants::SECRET_FILE_MODE);
    }

    #[test]
    fn test_missing_parent_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("secret.key");
        let err = get_or_create_key(&path).unwrap_err();
        assert!(matches!(err, KeyError::Io { .. }));
    }
}
