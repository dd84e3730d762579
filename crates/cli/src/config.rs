//! CLI configuration
//!
//! Settings come from an optional `erd.toml`:
//!
//! ```toml
//! storage_dir = ".erd"
//!
//! [keys]
//! entities = "entities"
//! relationships = "relationships"
//! ```
//!
//! `--storage-dir` (or `ERD_STORAGE_DIR`) overrides `storage_dir`.

use erd_core::{DiagramError, DiagramResult, StorageKeys};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "erd.toml";

/// Storage directory used when nothing else is configured
pub const DEFAULT_STORAGE_DIR: &str = ".erd";

/// Resolved CLI settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Directory holding one JSON file per storage key
    pub storage_dir: PathBuf,

    /// Storage key names
    pub keys: StorageKeys,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            keys: StorageKeys::default(),
        }
    }
}

impl CliConfig {
    /// Parse a TOML document
    pub fn from_toml(text: &str) -> DiagramResult<Self> {
        let config: CliConfig =
            toml::from_str(text).map_err(|e| DiagramError::InvalidConfig(e.to_string()))?;
        config.check()?;
        Ok(config)
    }

    /// Read a config file
    pub fn from_file(path: &Path) -> DiagramResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            DiagramError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&text)
    }

    /// Resolve settings from an explicit file, the default file, or defaults
    ///
    /// An explicit `path` must exist; the default `erd.toml` is optional.
    pub fn load(path: Option<&Path>, storage_dir: Option<PathBuf>) -> DiagramResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        if let Some(dir) = storage_dir {
            config.storage_dir = dir;
        }
        tracing::debug!("Using storage directory {}", config.storage_dir.display());
        Ok(config)
    }

    fn check(&self) -> DiagramResult<()> {
        if self.keys.entities.is_empty() || self.keys.relationships.is_empty() {
            return Err(DiagramError::InvalidConfig(
                "storage keys must not be empty".to_string(),
            ));
        }
        if self.keys.entities == self.keys.relationships {
            return Err(DiagramError::InvalidConfig(format!(
                "entities and relationships share the key '{}'",
                self.keys.entities
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
