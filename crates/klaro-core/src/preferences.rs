use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;
use klaro_config::settings::SettingsConfig;
use klaro_types::AUTO_DETECT;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::PreferenceError;

const SETTINGS_FILE: &str = "settings.json";
const TRANSLATION_GROUP: &str = "translation";

fn default_input_language() -> String {
    AUTO_DETECT.to_string()
}

fn default_output_language() -> String {
    "English".to_string()
}

/// Last used selections, stored under the `translation` group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    #[serde(default = "default_input_language")]
    pub input_language: String,
    #[serde(default = "default_output_language")]
    pub output_language: String,
    #[serde(default)]
    pub use_english_names: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            input_language: default_input_language(),
            output_language: default_output_language(),
            use_english_names: false,
        }
    }
}

/// Write-through persistence for [`Preferences`]
pub trait PreferenceStore: Send + Sync {
    /// Stored values, defaults for anything missing
    fn load(&self) -> Preferences;

    /// Persist all fields at once
    fn save(&self, preferences: &Preferences) -> Result<(), PreferenceError>;
}

/// JSON settings file shared with other settings groups
pub struct JsonPreferenceStore {
    path: PathBuf,
}

impl JsonPreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Explicit path if configured, otherwise the per-user config directory
    pub fn from_config(config: &SettingsConfig) -> Result<Self, PreferenceError> {
        if let Some(path) = &config.path {
            return Ok(Self::new(path));
        }

        let dirs = ProjectDirs::from(
            &config.qualifier,
            &config.organization,
            &config.application,
        )
        .ok_or(PreferenceError::NoConfigDir)?;

        Ok(Self::new(dirs.config_dir().join(SETTINGS_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Map<String, Value>, PreferenceError> {
        match fs::read_to_string(&self.path) {
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn load(&self) -> Preferences {
        let document = match self.read_document() {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(
                    "Ignoring unreadable settings at {}: {}",
                    self.path.display(),
                    e
                );
                return Preferences::default();
            }
        };

        match document.get(TRANSLATION_GROUP) {
            Some(group) => serde_json::from_value(group.clone()).unwrap_or_else(|e| {
                tracing::warn!("Invalid translation settings, using defaults: {e}");
                Preferences::default()
            }),
            None => Preferences::default(),
        }
    }

    fn save(&self, preferences: &Preferences) -> Result<(), PreferenceError> {
        // Other groups in the file are kept; a corrupt file is replaced
        let mut document = self.read_document().unwrap_or_default();
        document.insert(
            TRANSLATION_GROUP.to_string(),
            serde_json::to_value(preferences)?,
        );

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(&document)?)?;
        fs::rename(&tmp, &self.path)?;

        tracing::debug!("Saved preferences to {}", self.path.display());
        Ok(())
    }
}

/// Keeps preferences for the lifetime of the process only
#[derive(Default)]
pub struct MemoryPreferenceStore {
    saved: Mutex<Option<Preferences>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(preferences: Preferences) -> Self {
        Self {
            saved: Mutex::new(Some(preferences)),
        }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Preferences {
        self.saved
            .lock()
            .map(|saved| saved.clone().unwrap_or_default())
            .unwrap_or_default()
    }

    fn save(&self, preferences: &Preferences) -> Result<(), PreferenceError> {
        if let Ok(mut saved) = self.saved.lock() {
            *saved = Some(preferences.clone());
        }
        Ok(())
    }
}
