//! Placement of the user layer inside the logical viewport.
//!
//! # Coordinate System
//!
//! - Origin is the viewport's top-left corner, y grows downward
//! - `(x, y)` is where the image's own top-left corner lands
//! - Rotation is in degrees about that corner, positive = clockwise on screen
//! - `scale_x`/`scale_y` map image pixels to logical units

use serde::{Deserialize, Serialize};

/// The two layers of the composite, in paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Layer {
    /// The user's photo. Draggable and transformable.
    User,
    /// The decorative frame. Fixed, painted on top, never hit.
    Frame,
}

/// Position, scale and rotation of the user layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub rotation: f64,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
        }
    }
}

impl Placement {
    /// Size of the layer's box in logical units (before rotation).
    pub fn box_size(&self, image_width: u32, image_height: u32) -> (f64, f64) {
        (
            image_width as f64 * self.scale_x.abs(),
            image_height as f64 * self.scale_y.abs(),
        )
    }

    /// Map a viewport point back into image pixel space.
    ///
    /// Returns `None` for a degenerate (zero) scale.
    pub fn to_image(&self, px: f64, py: f64) -> Option<(f64, f64)> {
        if self.scale_x == 0.0 || self.scale_y == 0.0 {
            return None;
        }
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        let dx = px - self.x;
        let dy = py - self.y;
        // Inverse rotation, then inverse scale
        let rx = dx * cos + dy * sin;
        let ry = -dx * sin + dy * cos;
        Some((rx / self.scale_x, ry / self.scale_y))
    }

    /// Whether a viewport point falls on the layer's (rotated) box.
    pub fn contains(&self, image_width: u32, image_height: u32, px: f64, py: f64) -> bool {
        match self.to_image(px, py) {
            Some((u, v)) => {
                u >= 0.0 && v >= 0.0 && u < image_width as f64 && v < image_height as f64
            }
            None => false,
        }
    }
}

/// Geometry reported by the resize/rotate handle when a transform ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformBox {
    pub x: f64,
    pub y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub rotation: f64,
}

impl TransformBox {
    pub fn is_finite(&self) -> bool {
        [self.x, self.y, self.scale_x, self.scale_y, self.rotation]
            .iter()
            .all(|v| v.is_finite())
    }
}

impl From<Placement> for TransformBox {
    fn from(p: Placement) -> Self {
        Self {
            x: p.x,
            y: p.y,
            scale_x: p.scale_x,
            scale_y: p.scale_y,
            rotation: p.rotation,
        }
    }
}

impl From<TransformBox> for Placement {
    fn from(b: TransformBox) -> Self {
        Self {
            x: b.x,
            y: b.y,
            scale_x: b.scale_x,
            scale_y: b.scale_y,
            rotation: b.rotation,
        }
    }
}
