use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_program() -> String {
    "trans".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_list_flag() -> String {
    "-list-all".to_string()
}

fn default_brief_flag() -> String {
    "-b".to_string()
}

/// How to reach the external translation tool
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct TranslatorConfig {
    #[serde(default = "default_program")]
    pub program: String,
    /// Upper bound for a single invocation
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_list_flag")]
    pub list_flag: String,
    #[serde(default = "default_brief_flag")]
    pub brief_flag: String,
}

impl TranslatorConfig {
    pub fn new() -> Self {
        let program = env::var("KLARO_TRANS_PROGRAM").unwrap_or_else(|_| default_program());

        let timeout_seconds = env::var("KLARO_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v| *v > 0)
            .unwrap_or_else(default_timeout_seconds);

        Self {
            program,
            timeout_seconds,
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            timeout_seconds: default_timeout_seconds(),
            list_flag: default_list_flag(),
            brief_flag: default_brief_flag(),
        }
    }
}
