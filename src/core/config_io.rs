//! Loading and atomic saving of the forge.toml config file.

use crate::models::config::ForgeConfig;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

pub fn load(path: &Path) -> Result<ForgeConfig> {
    if !path.exists() {
        return Ok(ForgeConfig::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let config: ForgeConfig = toml::from_str(&content)
        .with_context(|| format!("parse config {}", path.display()))?;
    Ok(config)
}

pub fn save(path: &Path, config: &ForgeConfig) -> Result<()> {
    let content = toml::to_string_pretty(config).context("serialize config")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create dir {}", parent.display()))?;
    }
    let mut tmp = tempfile::NamedTempFile::new_in(
        path.parent().unwrap_or_else(|| Path::new(".")),
    )
    .context("create temp config")?;
    tmp.write_all(content.as_bytes()).context("write config")?;
    tmp.flush().ok();

    #[cfg(unix)]
    {
        let perm = fs::Permissions::from_mode(0o644);
        tmp.as_file()
            .set_permissions(perm)
            .context("set permissions on temp config")?;
    }

    tmp.persist(path)
        .map_err(|err| anyhow::anyhow!("persist config: {}", err))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::BackendKind;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load(&dir.path().join("forge.toml")).unwrap();
        assert_eq!(config.store.backend, BackendKind::Json);
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("forge.toml");
        let mut config = ForgeConfig::default();
        config.store.backend = BackendKind::Sqlite;
        config.generator.default_length = 24;
        save(&path, &config).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.store.backend, BackendKind::Sqlite);
        assert_eq!(loaded.generator.default_length, 24);
    }

    #[test]
    fn test_load_rejects_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("forge.toml");
        fs::write(&path, "store = not valid").unwrap();
        assert!(load(&path).is_err());
    }
}
