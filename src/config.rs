//! Application configuration
//!
//! Loaded from an optional `winclock.toml` next to the executable; any
//! missing or unparseable field falls back to defaults matching the
//! built-in look (sky-blue background, antique-white face, black rim
//! and hands, orange-red second hand).

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Color;
use crate::log::exe_dir;

/// Nominal refresh period in milliseconds
pub const DEFAULT_TICK_MS: u32 = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Clock application configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Window title
    pub title: String,
    /// Initial client width in pixels
    pub width: i32,
    /// Initial client height in pixels
    pub height: i32,
    /// Refresh timer period in milliseconds (best-effort)
    pub tick_ms: u32,
    /// Counter text font family
    pub font_family: String,
    /// Counter text font size in DIPs
    pub font_size: f32,
    /// Colors, as hex strings
    pub colors: ColorsConfig,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            title: "Analog Clock".to_string(),
            width: 640,
            height: 480,
            tick_ms: DEFAULT_TICK_MS,
            font_family: "Verdana".to_string(),
            font_size: 50.0,
            colors: ColorsConfig::default(),
        }
    }
}

/// Color scheme, each entry a hex string (#RGB, #RRGGBB or #RRGGBBAA)
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    pub background: String,
    pub face: String,
    pub rim: String,
    pub hands: String,
    pub second_hand: String,
    pub text: String,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            background: "#87ceeb".to_string(),
            face: "#faebd7".to_string(),
            rim: "#000000".to_string(),
            hands: "#000000".to_string(),
            second_hand: "#ff4500".to_string(),
            text: "#000000".to_string(),
        }
    }
}

/// Resolved color scheme ready for drawing
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub face: Color,
    pub rim: Color,
    pub hands: Color,
    pub second_hand: Color,
    pub text: Color,
}

impl ClockConfig {
    /// Load configuration from `winclock.toml` next to the executable,
    /// returning defaults if it is absent or invalid.
    pub fn load() -> Self {
        let path = exe_dir().join("winclock.toml");
        if !path.exists() {
            return Self::default();
        }
        Self::load_from_path(&path).unwrap_or_default()
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: ClockConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Resolve the configured hex colors; an unparseable entry falls
    /// back to its default.
    pub fn palette(&self) -> Palette {
        let defaults = ColorsConfig::default();
        let resolve = |configured: &str, fallback: &str| {
            Color::from_hex(configured)
                .or_else(|_| Color::from_hex(fallback))
                .unwrap_or(Color::BLACK)
        };
        Palette {
            background: resolve(&self.colors.background, &defaults.background),
            face: resolve(&self.colors.face, &defaults.face),
            rim: resolve(&self.colors.rim, &defaults.rim),
            hands: resolve(&self.colors.hands, &defaults.hands),
            second_hand: resolve(&self.colors.second_hand, &defaults.second_hand),
            text: resolve(&self.colors.text, &defaults.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_builtin_look() {
        let config = ClockConfig::default();
        assert_eq!(config.title, "Analog Clock");
        assert_eq!(config.tick_ms, 10);
        assert_eq!(config.font_family, "Verdana");

        let palette = config.palette();
        assert_eq!(palette.face, Color::rgb(0xfa, 0xeb, 0xd7));
        assert_eq!(palette.second_hand, Color::rgb(0xff, 0x45, 0x00));
        assert_eq!(palette.hands, Color::BLACK);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config: ClockConfig = toml::from_str(
            r##"
            title = "Kitchen Clock"
            tick_ms = 100

            [colors]
            second_hand = "#00ff00"
            "##,
        )
        .unwrap();

        assert_eq!(config.title, "Kitchen Clock");
        assert_eq!(config.tick_ms, 100);
        // Unspecified fields keep their defaults
        assert_eq!(config.width, 640);
        assert_eq!(config.colors.background, "#87ceeb");

        let palette = config.palette();
        assert_eq!(palette.second_hand, Color::rgb(0, 255, 0));
    }

    #[test]
    fn test_bad_hex_falls_back_to_default() {
        let mut config = ClockConfig::default();
        config.colors.face = "not-a-color".to_string();
        let palette = config.palette();
        assert_eq!(palette.face, Color::rgb(0xfa, 0xeb, 0xd7));
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let err = ClockConfig::load_from_path(Path::new("definitely/not/here.toml"));
        assert!(matches!(err, Err(ConfigError::Io(_))));
    }
}
