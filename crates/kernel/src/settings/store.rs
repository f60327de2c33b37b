//! Persistence of the settings blob.
//!
//! All reads and writes go through [`SettingsStore`], so the engine never
//! knows where the blob lives. Snapshots are loaded fresh for every request;
//! nothing here caches across requests.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, info};

use super::{SanitizeReport, SettingsSnapshot, sanitize};
use crate::error::SettingsError;

/// Where the settings blob is kept.
pub trait SettingsStore: Send + Sync {
    /// Read the stored blob, `None` if nothing was saved yet.
    fn load(&self) -> Result<Option<Value>, SettingsError>;

    /// Replace the stored blob.
    fn save(&self, blob: &Value) -> Result<(), SettingsError>;
}

/// In-process store, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    blob: RwLock<Option<Value>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a blob.
    pub fn with_blob(blob: Value) -> Self {
        Self {
            blob: RwLock::new(Some(blob)),
        }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Option<Value>, SettingsError> {
        Ok(self.blob.read().clone())
    }

    fn save(&self, blob: &Value) -> Result<(), SettingsError> {
        *self.blob.write() = Some(blob.clone());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Json,
    Yaml,
}

/// Settings blob kept in a JSON or YAML file, chosen by extension.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
    format: FileFormat,
}

impl FileSettingsStore {
    /// Open a store at `path`. The file does not need to exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let format = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => FileFormat::Json,
            Some("yaml" | "yml") => FileFormat::Yaml,
            _ => return Err(SettingsError::UnsupportedFormat { path }),
        };
        Ok(Self { path, format })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Result<Option<Value>, SettingsError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no settings file yet");
            return Ok(None);
        }

        let raw =
            fs::read_to_string(&self.path).map_err(|e| SettingsError::io(&self.path, e))?;
        if raw.trim().is_empty() {
            return Ok(None);
        }

        let blob = match self.format {
            FileFormat::Json => serde_json::from_str(&raw)?,
            FileFormat::Yaml => serde_yml::from_str(&raw)?,
        };
        Ok(Some(blob))
    }

    fn save(&self, blob: &Value) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| SettingsError::io(parent, e))?;
        }

        let contents = match self.format {
            FileFormat::Json => serde_json::to_string_pretty(blob)?,
            FileFormat::Yaml => serde_yml::to_string(blob)?,
        };
        fs::write(&self.path, contents).map_err(|e| SettingsError::io(&self.path, e))?;

        info!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

/// Load a fresh snapshot from a store. An empty store yields the defaults.
pub fn load_snapshot(store: &dyn SettingsStore) -> Result<SettingsSnapshot, SettingsError> {
    match store.load()? {
        Some(blob) => SettingsSnapshot::from_blob(&blob),
        None => Ok(SettingsSnapshot::default()),
    }
}

/// The validated save path: sanitize a submitted blob, then persist the
/// canonical form. Rejected items are reported, not persisted.
pub fn save_settings(
    store: &dyn SettingsStore,
    submitted: &Value,
) -> Result<SanitizeReport, SettingsError> {
    let report = sanitize(submitted)?;
    store.save(&report.blob())?;
    Ok(report)
}
