//! Canvas configuration.
//!
//! Every tunable lives in [`CanvasConfig`]. All sections default to the
//! values in [`crate::consts`], so a host can supply a partial JSON document
//! that overrides only what it needs.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::drag::DragConfig;
use crate::error::ErrorCode;
use crate::menu::MenuStyle;
use crate::registry::LayoutConfig;
use crate::viewport::ViewportConfig;

/// Error returned by [`CanvasConfig::from_json`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Parse(_) => "E_CONFIG_PARSE",
            Self::Invalid { .. } => "E_CONFIG_INVALID",
        }
    }
}

/// All canvas tunables.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub viewport: ViewportConfig,
    pub menu: MenuStyle,
    pub layout: LayoutConfig,
    pub drag: DragConfig,
}

impl CanvasConfig {
    /// Parse a (possibly partial) JSON document over the defaults and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] for values the canvas cannot work with.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that sizes and steps are usable.
    ///
    /// # Errors
    ///
    /// Returns the first offending field as [`ConfigError::Invalid`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive: [(&'static str, f64); 11] = [
            ("viewport.pan_step_x", self.viewport.pan_step_x),
            ("viewport.pan_step_y", self.viewport.pan_step_y),
            ("viewport.zoom_step", self.viewport.zoom_step),
            ("viewport.min_zoom", self.viewport.min_zoom),
            ("viewport.first_page_divisor", self.viewport.first_page_divisor),
            ("menu.width", self.menu.width),
            ("menu.row_height", self.menu.row_height),
            ("layout.annotation.width", self.layout.annotation.width),
            ("layout.annotation.height", self.layout.annotation.height),
            ("layout.image.width", self.layout.image.width),
            ("layout.image.height", self.layout.image.height),
        ];
        for (field, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::Invalid { field, reason: "must be positive" });
            }
        }
        if self.viewport.min_zoom > self.viewport.max_zoom {
            return Err(ConfigError::Invalid { field: "viewport.max_zoom", reason: "must not be below min_zoom" });
        }
        if self.viewport.min_zoom > 1.0 || self.viewport.max_zoom < 1.0 {
            return Err(ConfigError::Invalid { field: "viewport.min_zoom", reason: "zoom bounds must include 1.0" });
        }
        let non_negative: [(&'static str, f64); 3] = [
            ("menu.row_gap", self.menu.row_gap),
            ("layout.page_margin", self.layout.page_margin),
            ("drag.nudge", self.drag.nudge),
        ];
        for (field, value) in non_negative {
            if value.is_nan() || value < 0.0 {
                return Err(ConfigError::Invalid { field, reason: "must not be negative" });
            }
        }
        Ok(())
    }
}
