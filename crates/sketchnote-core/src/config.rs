//! Canvas configuration.

use crate::drawable::DEFAULT_FONT_SIZE;
use crate::geometry::DEFAULT_TOLERANCE;
use crate::history::MAX_UNDO_HISTORY;
use crate::viewport::{MAX_SCALE, MIN_SCALE, Viewport, ZOOM_STEP};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Canvas dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 900,
            height: 1200,
        }
    }
}

/// Tunables for the drawing canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub canvas_size: CanvasSize,
    /// Number of undo states kept.
    pub history_limit: usize,
    /// Maximum deviation introduced by freehand simplification.
    pub simplify_tolerance: f64,
    /// Shapes at or below this size on release are discarded as taps.
    pub min_shape_size: f64,
    pub default_stroke_width: f64,
    pub default_font_size: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    pub zoom_step: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            canvas_size: CanvasSize::default(),
            history_limit: MAX_UNDO_HISTORY,
            simplify_tolerance: DEFAULT_TOLERANCE,
            min_shape_size: 5.0,
            default_stroke_width: 3.0,
            default_font_size: DEFAULT_FONT_SIZE,
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            zoom_step: ZOOM_STEP,
        }
    }
}

impl CanvasConfig {
    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
            ConfigError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        if self.canvas_size.width == 0 || self.canvas_size.height == 0 {
            return Err(invalid("canvas_size", "dimensions must be non-zero"));
        }
        if self.simplify_tolerance < 0.0 || !self.simplify_tolerance.is_finite() {
            return Err(invalid("simplify_tolerance", "must be a finite non-negative number"));
        }
        if self.min_shape_size < 0.0 {
            return Err(invalid("min_shape_size", "must be non-negative"));
        }
        if self.default_stroke_width <= 0.0 {
            return Err(invalid("default_stroke_width", "must be positive"));
        }
        if self.default_font_size <= 0.0 {
            return Err(invalid("default_font_size", "must be positive"));
        }
        if !(self.min_scale > 0.0 && self.min_scale <= self.max_scale) {
            return Err(invalid(
                "min_scale",
                format!("must be positive and at most max_scale ({})", self.max_scale),
            ));
        }
        if self.zoom_step <= 0.0 {
            return Err(invalid("zoom_step", "must be positive"));
        }
        Ok(())
    }

    /// A fresh viewport using the configured zoom bounds.
    pub fn viewport(&self) -> Viewport {
        Viewport::with_limits(self.min_scale, self.max_scale, self.zoom_step)
    }
}
