//! @ai:module:intent Validation settings supplied by the editor or a TOML file
//! @ai:module:layer infrastructure
//! @ai:module:public_api Settings
//! @ai:module:stateless true

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// @ai:intent Toggles and timing read by the scheduler and aggregator
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_true")]
    pub validate_on_open: bool,
    #[serde(default = "default_true")]
    pub validate_on_save: bool,
    #[serde(default = "default_true")]
    pub annotations_enabled: bool,
    #[serde(default = "default_true")]
    pub schemas_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            validate_on_open: true,
            validate_on_save: true,
            annotations_enabled: true,
            schemas_enabled: true,
        }
    }
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_true() -> bool {
    true
}

impl Settings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// @ai:intent Load settings from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Self = toml::from_str(&content)?;
        Ok(settings)
    }

    /// @ai:intent Load settings, keeping defaults when the file is missing or malformed
    /// @ai:effects fs:read, log
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not load settings, using defaults");
                Self::default()
            }
        }
    }

    /// @ai:intent Decode an editor configuration payload
    /// @ai:effects pure
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value.clone())?)
    }

    /// @ai:intent Apply an editor configuration payload; a bad payload leaves current values in place
    /// @ai:effects state:write, log
    pub fn merge_json(&mut self, value: &serde_json::Value) {
        match Self::from_json(value) {
            Ok(settings) => *self = settings,
            Err(e) => warn!(error = %e, "Ignoring malformed settings payload"),
        }
    }
}
