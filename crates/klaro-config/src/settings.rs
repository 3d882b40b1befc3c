use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_qualifier() -> String {
    "io.github".to_string()
}

fn default_organization() -> String {
    "denysmb".to_string()
}

fn default_application() -> String {
    "Klaro".to_string()
}

/// Where persisted preferences live
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct SettingsConfig {
    #[serde(default = "default_qualifier")]
    pub qualifier: String,
    #[serde(default = "default_organization")]
    pub organization: String,
    #[serde(default = "default_application")]
    pub application: String,
    /// Explicit settings file, bypasses the platform config directory
    pub path: Option<PathBuf>,
}

impl SettingsConfig {
    pub fn new() -> Self {
        let path = env::var("KLARO_SETTINGS_PATH")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Self {
            path,
            ..Self::default()
        }
    }
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            qualifier: default_qualifier(),
            organization: default_organization(),
            application: default_application(),
            path: None,
        }
    }
}
