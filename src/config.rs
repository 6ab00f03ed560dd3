// Copyright 2025 the Inkpad Authors
// SPDX-License-Identifier: Apache-2.0

//! Runtime configuration loaded from TOML.
//!
//! Every field is optional in the file; anything left out keeps the
//! default from `settings`.
//!
//! ```toml
//! minimum_draw_distance = 16.0
//! maximum_accumulated_length = 120.0
//! ink_width = 3.0
//! ink_color = [0, 0, 255, 255]
//! eraser_width = 40.0
//! ```

use crate::error::ConfigError;
use crate::settings;
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SketchConfig {
    /// Squared-distance jitter threshold
    pub minimum_draw_distance: f64,
    /// May be `inf` to disable intermediate flushes
    pub maximum_accumulated_length: f64,
    pub ink_width: f64,
    /// Straight-alpha RGBA8
    pub ink_color: [u8; 4],
    pub eraser_width: f64,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            minimum_draw_distance: settings::window::MINIMUM_DRAW_DISTANCE,
            maximum_accumulated_length: settings::window::MAXIMUM_ACCUMULATED_LENGTH,
            ink_width: settings::ink::WIDTH,
            ink_color: settings::ink::RGBA8,
            eraser_width: settings::eraser::WIDTH,
        }
    }
}

impl SketchConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: SketchConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!("Loaded sketch config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive_width("ink_width", self.ink_width)?;
        positive_width("eraser_width", self.eraser_width)?;

        if !self.minimum_draw_distance.is_finite() || self.minimum_draw_distance < 0.0 {
            return Err(ConfigError::Invalid {
                field: "minimum_draw_distance",
                reason: format!("must be finite and >= 0, got {}", self.minimum_draw_distance),
            });
        }
        // Infinity is allowed and means "never split a stroke"
        if self.maximum_accumulated_length.is_nan() || self.maximum_accumulated_length < 0.0 {
            return Err(ConfigError::Invalid {
                field: "maximum_accumulated_length",
                reason: format!("must be >= 0, got {}", self.maximum_accumulated_length),
            });
        }
        Ok(())
    }

    pub fn ink_color(&self) -> Color {
        let [r, g, b, a] = self.ink_color;
        Color::from_rgba8(r, g, b, a)
    }
}

fn positive_width(field: &'static str, width: f64) -> Result<(), ConfigError> {
    if width.is_finite() && width > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be finite and > 0, got {width}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_settings() {
        let config = SketchConfig::default();
        assert_eq!(config.minimum_draw_distance, 25.0);
        assert_eq!(config.maximum_accumulated_length, 80.0);
        assert_eq!(config.ink_width, 5.0);
        assert_eq!(config.eraser_width, 50.0);
        assert_eq!(config.ink_color, [0x55, 0x55, 0x55, 0xff]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_document_is_default() {
        let config = SketchConfig::from_toml_str("").expect("empty config parses");
        assert_eq!(config, SketchConfig::default());
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = SketchConfig::from_toml_str("ink_width = 3.0\nink_color = [0, 0, 255, 255]\n")
            .expect("partial config parses");
        assert_eq!(config.ink_width, 3.0);
        assert_eq!(config.ink_color(), Color::from_rgba8(0, 0, 255, 255));
        assert_eq!(config.eraser_width, 50.0);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = SketchConfig::from_toml_str("brush = 1.0").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn non_positive_width_is_invalid() {
        let err = SketchConfig::from_toml_str("eraser_width = 0.0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "eraser_width",
                ..
            }
        ));
    }

    #[test]
    fn negative_threshold_is_invalid() {
        let err = SketchConfig::from_toml_str("minimum_draw_distance = -1.0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "minimum_draw_distance",
                ..
            }
        ));
    }

    #[test]
    fn unbounded_length_is_valid() {
        let config = SketchConfig {
            maximum_accumulated_length: f64::INFINITY,
            ..SketchConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = SketchConfig::load("/nonexistent/inkpad.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
