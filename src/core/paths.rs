//! Store path resolution and on-disk layout.

use crate::constants;
use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ForgePaths {
    pub root: PathBuf,
    pub config_toml: PathBuf,
    pub store_json: PathBuf,
    pub store_db: PathBuf,
    pub key_file: PathBuf,
    pub store_lock: PathBuf,
}

impl ForgePaths {
    /// Resolve store paths from CLI arg, env var, or auto-detection.
    pub fn resolve(root_arg: Option<PathBuf>) -> Result<Self> {
        if let Some(root) = root_arg {
            return Ok(Self::from_root(root));
        }
        if let Ok(root) = env::var("PASSFORGE_ROOT") {
            return Ok(Self::from_root(PathBuf::from(root)));
        }
        if let Some(found) = find_store_root()? {
            return Ok(Self::from_root(found));
        }
        Ok(Self::from_root(default_root()))
    }

    /// Create store paths from a root directory.
    pub fn from_root(root: PathBuf) -> Self {
        let config_toml = root.join(constants::CONFIG_FILE);
        let store_json = root.join(constants::STORE_FILE);
        let store_db = root.join(constants::DB_FILE);
        let key_file = root.join(constants::KEY_FILE);
        let store_lock = root.join(constants::LOCK_FILE);
        Self {
            root,
            config_toml,
            store_json,
            store_db,
            key_file,
            store_lock,
        }
    }
}

fn find_store_root() -> Result<Option<PathBuf>> {
    let cwd = env::current_dir().context("resolve current directory")?;
    for ancestor in cwd.ancestors() {
        if looks_like_root(ancestor) {
            return Ok(Some(ancestor.to_path_buf()));
        }
    }
    Ok(None)
}

fn looks_like_root(path: &Path) -> bool {
    path.join(constants::CONFIG_FILE).is_file()
}

fn default_root() -> PathBuf {
    match dirs::data_dir() {
        Some(data) => data.join(constants::DEFAULT_ROOT_DIR),
        None => PathBuf::from(".").join(constants::DEFAULT_ROOT_DIR),
    }
}

impl std::fmt::Display for ForgePaths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "store@{}", self.root.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_root() {
        let paths = ForgePaths::from_root(PathBuf::from("/test"));
        assert_eq!(paths.root, PathBuf::from("/test"));
        assert_eq!(paths.config_toml, PathBuf::from("/test/forge.toml"));
        assert_eq!(paths.store_json, PathBuf::from("/test/store.json"));
        assert_eq!(paths.store_db, PathBuf::from("/test/store.db"));
        assert_eq!(paths.key_file, PathBuf::from("/test/secret.key"));
        assert_eq!(paths.store_lock, PathBuf::from("/test/store.lock"));
    }
}
