//! Store configuration file model.

use serde::{Deserialize, Serialize};

use crate::constants;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForgeConfig {
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub generator: GeneratorSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSection {
    /// Which persistence backend holds credential records.
    #[serde(default)]
    pub backend: BackendKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Single JSON document, rewritten atomically on every save.
    #[default]
    Json,
    /// SQLite database with an atomic upsert per save.
    Sqlite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorSection {
    /// Length used by `generate` when `--length` is not given.
    #[serde(default = "default_length")]
    pub default_length: usize,
}

impl Default for GeneratorSection {
    fn default() -> Self {
        Self {
            default_length: default_length(),
        }
    }
}

fn default_length() -> usize {
    constants::DEFAULT_PASSWORD_LENGTH
}
