//! Editor configuration.
//!
//! All tunables of the framing editor live in one immutable [`EditorConfig`]
//! that is handed to the session at construction time. The page may pass a
//! partial JSON object; every field is `#[serde(default)]`, so only the values
//! it names override the defaults below.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capture::CameraConstraints;

/// Name under which the exported composite is offered for download.
pub const DEFAULT_DOWNLOAD_FILE_NAME: &str = "minha-foto-com-moldura.png";

/// Errors raised by [`EditorConfig::validate`].
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid viewport: width ({width}) and height ({height}) must be positive")]
    InvalidViewport { width: f64, height: f64 },

    #[error("Invalid zoom range: min {min}, max {max}, step {step}, default {default}")]
    InvalidZoomRange {
        min: f64,
        max: f64,
        step: f64,
        default: f64,
    },

    #[error("Minimum box size must be positive, got {0}")]
    InvalidMinBox(f64),

    #[error("Export pixel ratio must be positive, got {0}")]
    InvalidPixelRatio(f64),

    #[error("Maximum export edge must be non-zero")]
    InvalidMaxExportEdge,
}

/// Fixed logical drawing surface.
///
/// The viewport never changes at runtime. Responsive layout applies a
/// uniform display scale outside of this coordinate system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 360.0,
            height: 640.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Bounds and granularity of the user zoom slider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self {
            min: 0.5,
            max: 3.0,
            step: 0.1,
            default: 1.0,
        }
    }
}

impl ZoomRange {
    /// Clamp a slider value into range and snap it to the nearest step.
    ///
    /// Non-finite input falls back to the default multiplier.
    pub fn clamp(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.default;
        }
        let clamped = value.clamp(self.min, self.max);
        let steps = ((clamped - self.min) / self.step).round();
        // Snapping can overshoot `max` when the range is not a whole number of steps
        let snapped = (self.min + steps * self.step).min(self.max);
        // Strip accumulated float noise (0.1 * 7 + 0.5 = 1.2000000000000002)
        (snapped * 1e9).round() / 1e9
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Immutable configuration for an editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Logical canvas size (design size, not on-screen size).
    pub viewport: Viewport,
    /// User zoom slider bounds.
    pub zoom: ZoomRange,
    /// Smallest width/height the transform handle may produce, in logical units.
    pub min_box_size: f64,
    /// Pixel ratio requested when the user downloads the composite.
    pub export_pixel_ratio: f64,
    /// Largest exported edge in pixels.
    pub max_export_edge: u32,
    pub download_file_name: String,
    /// Base URL of the backend, used only for the startup health probe.
    pub api_base_url: String,
    pub health_path: String,
    pub camera: CameraConstraints,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            zoom: ZoomRange::default(),
            min_box_size: 5.0,
            export_pixel_ratio: 2.0,
            max_export_edge: 8192,
            download_file_name: DEFAULT_DOWNLOAD_FILE_NAME.to_string(),
            api_base_url: "http://localhost:4000".to_string(),
            health_path: "/api/health".to_string(),
            camera: CameraConstraints::default(),
        }
    }
}

impl EditorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the configuration for values the editor cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Viewport { width, height } = self.viewport;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ConfigError::InvalidViewport { width, height });
        }

        let z = self.zoom;
        let finite = [z.min, z.max, z.step, z.default].iter().all(|v| v.is_finite());
        if !finite || z.min <= 0.0 || z.max < z.min || z.step <= 0.0 || !z.contains(z.default) {
            return Err(ConfigError::InvalidZoomRange {
                min: z.min,
                max: z.max,
                step: z.step,
                default: z.default,
            });
        }

        if !(self.min_box_size.is_finite() && self.min_box_size > 0.0) {
            return Err(ConfigError::InvalidMinBox(self.min_box_size));
        }
        if !(self.export_pixel_ratio.is_finite() && self.export_pixel_ratio > 0.0) {
            return Err(ConfigError::InvalidPixelRatio(self.export_pixel_ratio));
        }
        if self.max_export_edge == 0 {
            return Err(ConfigError::InvalidMaxExportEdge);
        }
        Ok(())
    }

    /// Full URL of the backend health endpoint.
    pub fn health_url(&self) -> String {
        let base = self.api_base_url.trim_end_matches('/');
        if self.health_path.starts_with('/') {
            format!("{}{}", base, self.health_path)
        } else {
            format!("{}/{}", base, self.health_path)
        }
    }
}
