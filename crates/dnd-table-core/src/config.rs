//! Configuration types.
//!
//! The table widget is configured from `config.toml` in the dnd-table config
//! directory. Every field has a default, so a missing file is not an error.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Widget configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Column template, e.g. "60px 1fr 2fr". Computed from headers when unset.
    pub grid_column_settings: Option<String>,

    /// Maximum visible height, e.g. "480px". Unbounded when unset.
    pub max_height: Option<String>,

    /// Header labels, one per data column.
    pub headers: Vec<String>,

    /// Drag handle icon path.
    pub drag_handle_icon: String,

    /// Expand arrow icon path.
    pub expand_arrow_icon: String,

    /// Appearance settings
    pub appearance: AppearanceConfig,

    /// Key bindings
    pub keys: KeyBindingsConfig,
}

impl TableConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.keys.validate()?;
        Ok(config)
    }

    /// Read configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml(&text)
    }

    /// Read `config.toml` from the config directory, defaulting when absent.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = config_path().ok_or(ConfigError::NoConfigDir)?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// The column template in effect.
    ///
    /// Falls back to a narrow handle column followed by one flexible column
    /// per header.
    pub fn grid_columns(&self) -> String {
        if let Some(settings) = &self.grid_column_settings {
            return settings.clone();
        }

        let mut grid = String::from("30px");
        for _ in &self.headers {
            grid.push_str(" 1fr");
        }
        grid
    }

    /// Column tracks parsed from [`grid_columns`](Self::grid_columns).
    pub fn grid_tracks(&self) -> Vec<GridTrack> {
        GridTrack::parse_template(&self.grid_columns())
    }

    /// Maximum height in pixels, if it is given in pixels.
    pub fn max_height_px(&self) -> Option<f32> {
        let raw = self.max_height.as_deref()?.trim();
        let number = raw.strip_suffix("px").unwrap_or(raw).trim();
        number.parse::<f32>().ok().filter(|h| *h > 0.0)
    }
}

/// One column track of a grid template.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridTrack {
    /// Fixed width in pixels.
    Fixed(f32),
    /// Share of the remaining width.
    Fraction(f32),
}

impl GridTrack {
    /// Parse a space-separated template. Unknown tokens become `1fr`.
    pub fn parse_template(template: &str) -> Vec<Self> {
        template.split_whitespace().map(Self::parse).collect()
    }

    fn parse(token: &str) -> Self {
        if let Some(px) = token.strip_suffix("px").and_then(|n| n.parse().ok()) {
            return GridTrack::Fixed(px);
        }
        if let Some(fr) = token.strip_suffix("fr").and_then(|n| n.parse().ok()) {
            return GridTrack::Fraction(fr);
        }
        GridTrack::Fraction(1.0)
    }
}

/// Appearance configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppearanceConfig {
    /// Theme mode: "light", "dark", or "system"
    #[serde(default)]
    pub theme: ThemeMode,

    /// Accent hue in degrees (0-360) for the drop highlight.
    pub accent_hue: Option<f32>,
}

/// Theme mode selection.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

/// Key bindings, written as "ctrl+shift+e".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindingsConfig {
    /// Abandon the current drag and snap the row back.
    pub cancel_drag: String,
    /// Expand every row with an inner group.
    pub expand_all: String,
    /// Collapse every inner group.
    pub collapse_all: String,
}

impl Default for KeyBindingsConfig {
    fn default() -> Self {
        Self {
            cancel_drag: "escape".to_string(),
            expand_all: "ctrl+e".to_string(),
            collapse_all: "ctrl+shift+e".to_string(),
        }
    }
}

impl KeyBindingsConfig {
    /// All bindings paired with their action names.
    pub fn bindings(&self) -> [(&'static str, &str); 3] {
        [
            ("cancel_drag", self.cancel_drag.as_str()),
            ("expand_all", self.expand_all.as_str()),
            ("collapse_all", self.collapse_all.as_str()),
        ]
    }

    /// Reject empty keystrokes and empty modifier segments.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (_, keystroke) in self.bindings() {
            if keystroke.trim().is_empty() || keystroke.split('+').any(|part| part.trim().is_empty())
            {
                return Err(ConfigError::InvalidKeystroke(keystroke.to_string()));
            }
        }
        Ok(())
    }
}

/// Get the config directory path.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("dnd-table"))
}

/// Get the path to config.toml.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("config.toml"))
}
