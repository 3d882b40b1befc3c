use std::env;

use serde::{Deserialize, Serialize};

use self::settings::SettingsConfig;
use self::translator::TranslatorConfig;

pub mod settings;
pub mod translator;

#[derive(Serialize, Deserialize, Clone)]
pub struct Config {
    pub translator: TranslatorConfig,
    pub settings: SettingsConfig,

    /// Emit logs as JSON lines instead of the human readable format
    pub log_json: bool,
    /// Capacity of the backend -> front-end channel
    pub notify_capacity: usize,
    /// Capacity of the front-end -> backend channel
    pub request_capacity: usize,
}

impl Config {
    pub fn new() -> Self {
        let log_json = env::var("KLARO_LOG_JSON")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Config {
            translator: TranslatorConfig::new(),
            settings: SettingsConfig::new(),

            log_json,
            notify_capacity: 256,
            request_capacity: 64,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
