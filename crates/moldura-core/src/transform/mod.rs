//! Geometry of the user layer: orientation, fit, placement and editing.
//!
//! # Pipeline
//!
//! A new photo flows through these steps before it is painted:
//! 1. Orientation correction (camera captures only)
//! 2. Contain fit against the viewport, producing the base scale
//! 3. Centring at `base scale * zoom`
//! 4. Interactive edits (zoom slider, drag, resize/rotate handle)
//!
//! # Coordinate System
//!
//! - All placement values are in logical viewport units
//! - Origin is top-left, y grows downward
//! - Rotation angles are in degrees, positive = clockwise on screen

mod fit;
mod orientation;
mod placement;
mod state;

pub use fit::{centered_origin, fit_scale, FitScale};
pub use orientation::{
    correct_capture_png, correct_orientation, mirror_horizontal, needs_rotation, CorrectedCapture,
    CorrectionError, DeviceOrientation,
};
pub use placement::{Layer, Placement, TransformBox};
pub use state::{RejectReason, Selection, TransformOutcome, TransformState};
