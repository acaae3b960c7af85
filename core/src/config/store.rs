//! Persistence backends for the settings snapshot.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use tweaks_types::Settings;

use super::heal::{heal_settings, serialize_settings};
use crate::error::ConfigError;

const CONFIG_DIR_NAME: &str = "tweaks";
const SETTINGS_FILE_NAME: &str = "settings.toml";

/// A snapshot read from a store, already healed in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSettings {
    pub settings: Settings,
    /// The persisted form is missing fields or holds rejected values.
    pub needs_write_back: bool,
}

pub trait SettingsStore: Send {
    fn read(&self) -> Result<LoadedSettings, ConfigError>;
    fn save(&mut self, settings: &Settings) -> Result<(), ConfigError>;
}

/// TOML file on disk.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/tweaks/settings.toml`.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(SETTINGS_FILE_NAME))
            .ok_or(ConfigError::NoConfigDir)
    }
}

impl SettingsStore for FileSettingsStore {
    fn read(&self) -> Result<LoadedSettings, ConfigError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(text) => Some(text),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::info!(path = ?self.path, "No settings file, creating defaults");
                None
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let healed = heal_settings(raw.as_deref())?;
        Ok(LoadedSettings {
            settings: healed.settings,
            needs_write_back: healed.needs_write_back,
        })
    }

    fn save(&mut self, settings: &Settings) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let text = serialize_settings(settings)?;
        fs::write(&self.path, text).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// In-memory store, used by the simulator's dry runs and tests.
///
/// Clones share the same backing text, so a test can keep one handle while
/// the mirror owns another.
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    inner: Arc<Mutex<MemoryContents>>,
}

#[derive(Debug, Default)]
struct MemoryContents {
    raw: Option<String>,
    writes: usize,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(text: impl Into<String>) -> Self {
        let store = Self::new();
        store.set_contents(text);
        store
    }

    pub fn with_settings(settings: &Settings) -> Result<Self, ConfigError> {
        Ok(Self::with_contents(serialize_settings(settings)?))
    }

    fn lock(&self) -> MutexGuard<'_, MemoryContents> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn contents(&self) -> Option<String> {
        self.lock().raw.clone()
    }

    /// Replace the stored text as an external editor would.
    pub fn set_contents(&self, text: impl Into<String>) {
        self.lock().raw = Some(text.into());
    }

    pub fn write_count(&self) -> usize {
        self.lock().writes
    }
}

impl SettingsStore for MemorySettingsStore {
    fn read(&self) -> Result<LoadedSettings, ConfigError> {
        let raw = self.contents();
        let healed = heal_settings(raw.as_deref())?;
        Ok(LoadedSettings {
            settings: healed.settings,
            needs_write_back: healed.needs_write_back,
        })
    }

    fn save(&mut self, settings: &Settings) -> Result<(), ConfigError> {
        let text = serialize_settings(settings)?;
        let mut contents = self.lock();
        contents.raw = Some(text);
        contents.writes += 1;
        Ok(())
    }
}
