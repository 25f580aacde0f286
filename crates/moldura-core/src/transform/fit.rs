//! "Contain" fit of the user photo inside the viewport.

use crate::config::Viewport;

/// Base scale that makes an image fit entirely inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitScale {
    pub scale: f64,
    /// Set when the image size was unknown; the scale is a neutral 1.0
    /// and must be recomputed once dimensions arrive.
    pub pending: bool,
}

impl FitScale {
    /// Neutral scale used before an image size is known.
    pub fn neutral() -> Self {
        Self {
            scale: 1.0,
            pending: true,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// Compute the contain scale `min(W/w, H/h)`.
///
/// The whole image stays visible and at least one scaled edge matches the
/// viewport exactly. A zero width or height yields [`FitScale::neutral`].
pub fn fit_scale(width: u32, height: u32, viewport: Viewport) -> FitScale {
    if width == 0 || height == 0 {
        return FitScale::neutral();
    }

    let scale_to_fit_width = viewport.width / width as f64;
    let scale_to_fit_height = viewport.height / height as f64;

    FitScale {
        scale: scale_to_fit_width.min(scale_to_fit_height),
        pending: false,
    }
}

/// Top-left origin that centres an image of `width x height` drawn at `scale`.
pub fn centered_origin(width: u32, height: u32, scale: f64, viewport: Viewport) -> (f64, f64) {
    let x = (viewport.width - width as f64 * scale) / 2.0;
    let y = (viewport.height - height as f64 * scale) / 2.0;
    (x, y)
}
