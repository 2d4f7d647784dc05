//! Configuration snapshot and persistence.
//!
//! The persisted record is a flat JSON document at `~/.quill/config.json`
//! with the keys `apiKey`, `selectedModel`, and `prompts`. [`ConfigStore`]
//! owns the file and the current in-memory [`ConfigSnapshot`]; snapshots are
//! immutable values replaced wholesale on every change, so a reader holding
//! one never observes a half-applied update.
//!
//! The same JSON document doubles as the import/export interchange format.
//! Import accepts any subset of the three keys and merges only what it
//! recognizes, leaving the rest of the snapshot unchanged.

#![allow(clippy::missing_errors_doc)]

use quill_types::PromptCatalog;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write config at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid settings document: {0}")]
    MalformedImport(#[source] serde_json::Error),
    #[error("no home directory; pass an explicit config path")]
    NoHomeDir,
}

/// Point-in-time copy of the persisted configuration.
///
/// Plain strings on purpose: "non-empty before use" is enforced at the
/// exchange boundary, not here, so a half-configured install still loads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    #[serde(rename = "apiKey", default)]
    pub api_key: String,
    #[serde(rename = "selectedModel", default)]
    pub selected_model: String,
    #[serde(default)]
    pub prompts: PromptCatalog,
}

/// Subset document accepted by import: any combination of the three keys.
#[derive(Debug, Default, Deserialize)]
struct ImportedSettings {
    #[serde(rename = "apiKey")]
    api_key: Option<String>,
    #[serde(rename = "selectedModel")]
    selected_model: Option<String>,
    prompts: Option<PromptCatalog>,
}

impl ConfigSnapshot {
    /// Serialize to the canonical interchange document.
    pub fn export(&self) -> Result<String, ConfigError> {
        // Serializing a plain struct to JSON cannot fail in practice, but the
        // signature stays honest about serde_json's contract.
        serde_json::to_string_pretty(self).map_err(ConfigError::MalformedImport)
    }

    /// Merge an imported document into a copy of this snapshot.
    ///
    /// Only the recognized keys present in `document` are applied; everything
    /// else in the snapshot is carried over unchanged. Unknown keys in the
    /// document are ignored.
    pub fn apply_import(&self, document: &str) -> Result<Self, ConfigError> {
        let imported: ImportedSettings =
            serde_json::from_str(document).map_err(ConfigError::MalformedImport)?;

        let mut next = self.clone();
        if let Some(api_key) = imported.api_key {
            next.api_key = api_key;
        }
        if let Some(selected_model) = imported.selected_model {
            next.selected_model = selected_model;
        }
        if let Some(prompts) = imported.prompts {
            next.prompts = prompts;
        }
        Ok(next)
    }
}

/// Owner of the config file and the current snapshot.
///
/// All mutation goes through [`replace`](Self::replace): persist first, then
/// swap the in-memory `Arc` so readers move between complete snapshots.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    current: RwLock<Arc<ConfigSnapshot>>,
}

impl ConfigStore {
    /// Default config file location, `~/.quill/config.json`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".quill").join("config.json"))
    }

    /// Open the store at the default location.
    pub fn open_default() -> Result<Self, ConfigError> {
        let path = Self::default_path().ok_or(ConfigError::NoHomeDir)?;
        Self::open(path)
    }

    /// Open the store at `path`, loading the current snapshot.
    ///
    /// A missing file is not an error; it yields the default (empty)
    /// snapshot, matching a fresh install.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let snapshot = load_snapshot(&path)?;
        Ok(Self {
            path,
            current: RwLock::new(Arc::new(snapshot)),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The latest snapshot. Cheap to call; hold the `Arc`, not the store.
    #[must_use]
    pub fn snapshot(&self) -> Arc<ConfigSnapshot> {
        Arc::clone(
            &self
                .current
                .read()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }

    /// Re-read the file and replace the in-memory snapshot wholesale.
    pub fn reload(&self) -> Result<Arc<ConfigSnapshot>, ConfigError> {
        let snapshot = Arc::new(load_snapshot(&self.path)?);
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::clone(&snapshot);
        Ok(snapshot)
    }

    /// Persist `snapshot` and make it current.
    pub fn replace(&self, snapshot: ConfigSnapshot) -> Result<Arc<ConfigSnapshot>, ConfigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: self.path.clone(),
                source,
            })?;
        }

        let mut document = snapshot.export()?;
        document.push('\n');
        std::fs::write(&self.path, document).map_err(|source| ConfigError::Write {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), "Config persisted");

        let snapshot = Arc::new(snapshot);
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::clone(&snapshot);
        Ok(snapshot)
    }
}

fn load_snapshot(path: &Path) -> Result<ConfigSnapshot, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No config file; using defaults");
            return Ok(ConfigSnapshot::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
