#![forbid(unsafe_code)]

//! Engine configuration as data.
//!
//! [`SortableConfig`] gathers every tunable of the sensors and the
//! announcement queue. It loads from TOML or JSON and
//! every section falls back to its default when omitted.
//!
//! ```toml
//! [pointer.activation]
//! kind = "delay"
//! delay_ms = 250
//! tolerance = 5.0
//!
//! [keyboard]
//! axis = "horizontal"
//! wrap_navigation = true
//! ```
//!
//! ```rust,ignore
//! let config = SortableConfig::load("sortable.toml")?;
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::announce::DEFAULT_MAX_QUEUE;
use crate::error::ConfigError;
use crate::sensor::{ActivationConstraint, KeyboardSensor, ListAxis, PointerSensor};

// ---------------------------------------------------------------------------
// Top-level SortableConfig
// ---------------------------------------------------------------------------

/// Every tunable of a sortable list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortableConfig {
    /// Pointer sensor parameters.
    pub pointer: PointerConfig,
    /// Keyboard sensor parameters.
    pub keyboard: KeyboardConfig,
    /// Screen reader announcement parameters.
    pub announcements: AnnouncementConfig,
}

impl SortableConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Load a file by extension (`.json`, otherwise TOML) and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json_file(path)?,
            _ => Self::from_toml_file(path)?,
        };
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        match self.pointer.activation {
            ActivationConstraint::Distance { distance } => {
                if !distance.is_finite() || distance < 0.0 {
                    errors.push(format!(
                        "pointer.activation.distance must be finite and >= 0, got {distance}"
                    ));
                }
            }
            ActivationConstraint::Delay { tolerance, .. } => {
                if !tolerance.is_finite() || tolerance < 0.0 {
                    errors.push(format!(
                        "pointer.activation.tolerance must be finite and >= 0, got {tolerance}"
                    ));
                }
            }
        }

        if self.announcements.enabled && self.announcements.max_queue == 0 {
            errors.push("announcements.max_queue must be > 0".into());
        }

        errors
    }

    /// Build the pointer sensor described by this config.
    #[must_use]
    pub fn pointer_sensor(&self) -> PointerSensor {
        PointerSensor::new(self.pointer.activation)
    }

    /// Build the keyboard sensor described by this config.
    #[must_use]
    pub fn keyboard_sensor(&self) -> KeyboardSensor {
        KeyboardSensor::new(self.keyboard.axis, self.keyboard.wrap_navigation)
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Pointer sensor parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerConfig {
    /// When a press turns into a drag. Default: 8 px distance.
    pub activation: ActivationConstraint,
}

/// Keyboard sensor parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardConfig {
    /// Axis whose arrow keys step the dragged item. Default: vertical.
    pub axis: ListAxis,
    /// Step from the last slot to the first and back. Default: false.
    pub wrap_navigation: bool,
}

/// Announcement queue parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnouncementConfig {
    /// Default: true.
    pub enabled: bool,
    /// Default: 8.
    pub max_queue: usize,
}

impl Default for AnnouncementConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_queue: DEFAULT_MAX_QUEUE,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
