//! Demo configuration file handling
//!
//! The demo reads an optional `sift.toml`:
//!
//! ```toml
//! [window]
//! width = 800
//! height = 900
//!
//! [dropdown]
//! width = 360
//! search_debounce_ms = 50
//!
//! [logging]
//! filter = "info,sift_cn=debug"
//!
//! [[script]]
//! action = "click"
//! target = "users/trigger"
//!
//! [[script]]
//! action = "type"
//! text = "grumpy"
//!
//! [[script]]
//! action = "wait"
//! ms = 60
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use sift_core::events::KeyCode;
use sift_layout::ElementBounds;

use crate::error::{AppError, Result};

// =============================================================================
// Top level
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub dropdown: DropdownLayoutConfig,
    pub logging: LoggingConfig,
    /// Interaction replayed after mounting
    pub script: Vec<ScriptStep>,
}

impl AppConfig {
    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate TOML config text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        positive("window.width", self.window.width)?;
        positive("window.height", self.window.height)?;
        positive("dropdown.width", self.dropdown.width)?;
        positive("dropdown.height", self.dropdown.height)?;
        if !(self.dropdown.spacing >= 0.0) {
            return Err(AppError::ConfigValue {
                field: "dropdown.spacing",
                reason: format!("must not be negative, got {}", self.dropdown.spacing),
            });
        }
        if self.dropdown.batch_size == 0 {
            return Err(AppError::ConfigValue {
                field: "dropdown.batch_size",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(AppError::ConfigValue {
            field,
            reason: format!("must be positive, got {value}"),
        })
    }
}

// =============================================================================
// Sections
// =============================================================================

/// Size of the virtual window the showcase is laid out in
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 900.0,
        }
    }
}

/// Placement and behavior shared by the showcase dropdowns
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DropdownLayoutConfig {
    /// Left edge of the column
    pub x: f32,
    /// Top of the first dropdown
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Vertical space between dropdowns
    pub spacing: f32,
    pub search_debounce_ms: u64,
    pub batch_size: usize,
}

impl Default for DropdownLayoutConfig {
    fn default() -> Self {
        Self {
            x: 40.0,
            y: 40.0,
            width: 360.0,
            height: 40.0,
            spacing: 24.0,
            search_debounce_ms: 50,
            batch_size: 100,
        }
    }
}

impl DropdownLayoutConfig {
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Slot of the `index`th dropdown in the column
    pub fn slot(&self, index: usize) -> ElementBounds {
        let y = self.y + index as f32 * (self.height + self.spacing);
        ElementBounds::new(self.x, y, self.width, self.height)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directives
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

// =============================================================================
// Script
// =============================================================================

/// One scripted interaction
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ScriptStep {
    /// Move the pointer
    Move { x: f32, y: f32 },
    /// Click an element by key, or a point
    Click {
        #[serde(default)]
        target: Option<String>,
        #[serde(default)]
        x: Option<f32>,
        #[serde(default)]
        y: Option<f32>,
    },
    /// Type into the focused element
    Type { text: String },
    Key { key: ScriptKey },
    /// Advance the clock
    Wait { ms: u64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptKey {
    Backspace,
    Escape,
    Enter,
}

impl From<ScriptKey> for KeyCode {
    fn from(key: ScriptKey) -> Self {
        match key {
            ScriptKey::Backspace => KeyCode::Backspace,
            ScriptKey::Escape => KeyCode::Escape,
            ScriptKey::Enter => KeyCode::Enter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.dropdown.search_debounce(), Duration::from_millis(50));
        assert_eq!(config.dropdown.batch_size, 100);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_partial_sections() {
        let config = AppConfig::from_toml(
            r#"
            [dropdown]
            width = 200
            spacing = 10

            [logging]
            filter = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.dropdown.width, 200.0);
        assert_eq!(config.dropdown.height, 40.0);
        assert_eq!(config.logging.filter, "debug");

        let second = config.dropdown.slot(1);
        assert_eq!(second.y, 40.0 + 50.0);
        assert_eq!(second.width, 200.0);
    }

    #[test]
    fn test_script_steps() {
        let config = AppConfig::from_toml(
            r#"
            [[script]]
            action = "click"
            target = "fruit/trigger"

            [[script]]
            action = "click"
            x = 5
            y = 6

            [[script]]
            action = "type"
            text = "kiwi"

            [[script]]
            action = "key"
            key = "escape"

            [[script]]
            action = "wait"
            ms = 60
            "#,
        )
        .unwrap();

        assert_eq!(
            config.script,
            vec![
                ScriptStep::Click {
                    target: Some("fruit/trigger".to_string()),
                    x: None,
                    y: None
                },
                ScriptStep::Click {
                    target: None,
                    x: Some(5.0),
                    y: Some(6.0)
                },
                ScriptStep::Type {
                    text: "kiwi".to_string()
                },
                ScriptStep::Key {
                    key: ScriptKey::Escape
                },
                ScriptStep::Wait { ms: 60 },
            ]
        );
        assert_eq!(KeyCode::from(ScriptKey::Escape), KeyCode::Escape);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            AppConfig::from_toml("[dropdown]\nbatch_size = 0"),
            Err(AppError::ConfigValue {
                field: "dropdown.batch_size",
                ..
            })
        ));
        assert!(matches!(
            AppConfig::from_toml("[window]\nwidth = -1"),
            Err(AppError::ConfigValue { field: "window.width", .. })
        ));
        assert!(matches!(
            AppConfig::from_toml("[[script]]\naction = \"jump\""),
            Err(AppError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            AppConfig::load("/nonexistent/sift.toml"),
            Err(AppError::ConfigRead { .. })
        ));
    }
}
