//! Interactive transform state of the user layer.
//!
//! Three input channels edit the placement and must compose without
//! stepping on each other:
//!
//! 1. Zoom slider: changes the zoom multiplier only
//! 2. Drag: changes `x`/`y` only
//! 3. Resize/rotate handle: replaces the whole geometry, subject to the
//!    minimum box size
//!
//! The handle's stretch is stored relative to the effective scale, so a
//! later zoom change rescales a resized photo proportionally instead of
//! discarding the resize.

use log::{debug, warn};

use super::fit::{centered_origin, fit_scale, FitScale};
use super::placement::{Layer, Placement, TransformBox};
use crate::config::{EditorConfig, Viewport, ZoomRange};

/// Selection state of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Deselected,
    /// The user photo is selected and its transform handles are shown.
    UserLayer,
}

/// Why a handle edit was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// No user image is loaded.
    NoImage,
    /// Handles are only shown on a selected layer.
    NotSelected,
    /// The resulting box would be smaller than the minimum.
    BelowMinimum,
    /// Scale was zero or negative.
    NonPositiveScale,
    NonFinite,
}

/// Result of a handle edit. A rejected edit leaves the placement untouched.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformOutcome {
    Applied,
    Rejected(RejectReason),
}

/// Single source of truth for the user layer's placement.
#[derive(Debug, Clone)]
pub struct TransformState {
    viewport: Viewport,
    zoom_range: ZoomRange,
    min_box_size: f64,
    image_size: Option<(u32, u32)>,
    fit: FitScale,
    zoom: f64,
    x: f64,
    y: f64,
    rotation: f64,
    stretch_x: f64,
    stretch_y: f64,
    selection: Selection,
}

impl TransformState {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            viewport: config.viewport,
            zoom_range: config.zoom,
            min_box_size: config.min_box_size,
            image_size: None,
            fit: FitScale::neutral(),
            zoom: config.zoom.default,
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            stretch_x: 1.0,
            stretch_y: 1.0,
            selection: Selection::Deselected,
        }
    }

    /// Reset placement for a newly loaded image.
    ///
    /// The base scale is recomputed, the image is centred at the effective
    /// scale, rotation and stretch are cleared, and the selection is dropped.
    /// The zoom multiplier is owned by the slider and is kept.
    pub fn reset_for_image(&mut self, width: u32, height: u32) {
        self.image_size = Some((width, height));
        self.fit = fit_scale(width, height, self.viewport);
        self.rotation = 0.0;
        self.stretch_x = 1.0;
        self.stretch_y = 1.0;
        self.selection = Selection::Deselected;
        self.recenter();

        debug!(
            "placement reset for {}x{}: base scale {:.4}{}",
            width,
            height,
            self.fit.scale,
            if self.fit.pending { " (pending)" } else { "" }
        );
    }

    /// Supply dimensions for an image whose fit is still pending.
    ///
    /// Returns true if the fit was recomputed. Has no effect once the fit
    /// is known.
    pub fn resolve_dimensions(&mut self, width: u32, height: u32) -> bool {
        if self.image_size.is_none() || !self.fit.pending || width == 0 || height == 0 {
            return false;
        }
        self.reset_for_image(width, height);
        true
    }

    /// Forget the current image.
    pub fn clear(&mut self) {
        self.image_size = None;
        self.fit = FitScale::neutral();
        self.x = 0.0;
        self.y = 0.0;
        self.rotation = 0.0;
        self.stretch_x = 1.0;
        self.stretch_y = 1.0;
        self.selection = Selection::Deselected;
    }

    /// Apply a zoom slider value. Position and rotation are not touched.
    ///
    /// Returns the multiplier actually applied after clamping and snapping.
    pub fn set_zoom(&mut self, value: f64) -> f64 {
        self.zoom = self.zoom_range.clamp(value);
        self.zoom
    }

    /// Move the layer to where a drag ended. Scale and rotation are kept.
    ///
    /// Returns false if there is no image or the position is not finite.
    pub fn drag_end(&mut self, x: f64, y: f64) -> bool {
        if self.image_size.is_none() || !x.is_finite() || !y.is_finite() {
            return false;
        }
        self.x = x;
        self.y = y;
        true
    }

    /// Apply the geometry produced by the resize/rotate handle.
    pub fn transform_end(&mut self, geometry: TransformBox) -> TransformOutcome {
        let outcome = self.check_transform(&geometry);
        match outcome {
            TransformOutcome::Applied => {
                let effective = self.effective_scale();
                self.x = geometry.x;
                self.y = geometry.y;
                self.rotation = geometry.rotation;
                self.stretch_x = geometry.scale_x / effective;
                self.stretch_y = geometry.scale_y / effective;
            }
            TransformOutcome::Rejected(reason) => {
                warn!("transform rejected: {:?}", reason);
            }
        }
        outcome
    }

    fn check_transform(&self, geometry: &TransformBox) -> TransformOutcome {
        use TransformOutcome::Rejected;

        let Some((width, height)) = self.image_size else {
            return Rejected(RejectReason::NoImage);
        };
        if self.selection != Selection::UserLayer {
            return Rejected(RejectReason::NotSelected);
        }
        if !geometry.is_finite() {
            return Rejected(RejectReason::NonFinite);
        }
        if geometry.scale_x <= 0.0 || geometry.scale_y <= 0.0 {
            return Rejected(RejectReason::NonPositiveScale);
        }
        let (box_w, box_h) = Placement::from(*geometry).box_size(width, height);
        if box_w < self.min_box_size || box_h < self.min_box_size {
            return Rejected(RejectReason::BelowMinimum);
        }
        TransformOutcome::Applied
    }

    /// Which layer a pointer at `(x, y)` would hit.
    ///
    /// The frame is not interactive, so only the user layer can be hit.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<Layer> {
        let (width, height) = self.image_size?;
        self.placement()
            .contains(width, height, x, y)
            .then_some(Layer::User)
    }

    /// Handle a click: select the photo if hit, otherwise deselect.
    pub fn click(&mut self, x: f64, y: f64) -> Selection {
        self.selection = match self.hit_test(x, y) {
            Some(Layer::User) => Selection::UserLayer,
            _ => Selection::Deselected,
        };
        self.selection
    }

    /// Select the user layer, if one is loaded.
    pub fn select_user(&mut self) -> Selection {
        if self.image_size.is_some() {
            self.selection = Selection::UserLayer;
        }
        self.selection
    }

    pub fn deselect(&mut self) {
        self.selection = Selection::Deselected;
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn has_image(&self) -> bool {
        self.image_size.is_some()
    }

    pub fn image_size(&self) -> Option<(u32, u32)> {
        self.image_size
    }

    pub fn fit(&self) -> FitScale {
        self.fit
    }

    pub fn base_scale(&self) -> f64 {
        self.fit.scale
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// `base_scale * zoom`.
    pub fn effective_scale(&self) -> f64 {
        self.fit.scale * self.zoom
    }

    /// Current placement of the user layer.
    pub fn placement(&self) -> Placement {
        let effective = self.effective_scale();
        Placement {
            x: self.x,
            y: self.y,
            scale_x: effective * self.stretch_x,
            scale_y: effective * self.stretch_y,
            rotation: self.rotation,
        }
    }

    fn recenter(&mut self) {
        let (x, y) = match self.image_size {
            Some((w, h)) => centered_origin(w, h, self.effective_scale(), self.viewport),
            None => (0.0, 0.0),
        };
        self.x = x;
        self.y = y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(width: u32, height: u32) -> TransformState {
        let mut state = TransformState::new(&EditorConfig::default());
        state.reset_for_image(width, height);
        state
    }

    #[test]
    fn test_initial_placement_is_centered() {
        let state = loaded(600, 800);
        let p = state.placement();
        assert!((state.base_scale() - 0.6).abs() < 1e-12);
        assert!((p.scale_x - 0.6).abs() < 1e-12);
        assert!(p.x.abs() < 1e-9);
        assert!((p.y - 80.0).abs() < 1e-9);
        assert_eq!(p.rotation, 0.0);
        assert_eq!(state.selection(), Selection::Deselected);
    }

    #[test]
    fn test_zoom_keeps_position_and_rotation() {
        let mut state = loaded(600, 800);
        state.select_user();
        let geometry = TransformBox {
            x: 12.0,
            y: 34.0,
            scale_x: 0.6,
            scale_y: 0.6,
            rotation: 15.0,
        };
        assert_eq!(state.transform_end(geometry), TransformOutcome::Applied);

        let applied = state.set_zoom(2.0);
        assert_eq!(applied, 2.0);
        let p = state.placement();
        assert_eq!((p.x, p.y, p.rotation), (12.0, 34.0, 15.0));
        assert!((state.effective_scale() - 1.2).abs() < 1e-12);
        assert!((p.scale_x - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut state = loaded(600, 800);
        assert_eq!(state.set_zoom(0.1), 0.5);
        assert_eq!(state.set_zoom(9.0), 3.0);
        assert_eq!(state.set_zoom(f64::NAN), 1.0);
    }

    #[test]
    fn test_zoom_preserves_handle_stretch() {
        let mut state = loaded(600, 800);
        state.select_user();
        let geometry = TransformBox {
            x: 0.0,
            y: 0.0,
            scale_x: 1.2,
            scale_y: 0.6,
            rotation: 0.0,
        };
        assert_eq!(state.transform_end(geometry), TransformOutcome::Applied);

        state.set_zoom(0.5);
        let p = state.placement();
        assert!((p.scale_x - 0.6).abs() < 1e-12);
        assert!((p.scale_y - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_drag_moves_only_position() {
        let mut state = loaded(600, 800);
        let before = state.placement();
        assert!(state.drag_end(-40.0, 15.5));
        let after = state.placement();
        assert_eq!((after.x, after.y), (-40.0, 15.5));
        assert_eq!(after.scale_x, before.scale_x);
        assert_eq!(after.rotation, before.rotation);
    }

    #[test]
    fn test_drag_without_image_is_ignored() {
        let mut state = TransformState::new(&EditorConfig::default());
        assert!(!state.drag_end(10.0, 10.0));
        assert!(!state.drag_end(f64::NAN, 10.0));
    }

    #[test]
    fn test_transform_below_minimum_is_rejected() {
        let mut state = loaded(600, 800);
        state.select_user();
        let before = state.placement();

        // 600 * 0.008 = 4.8 < 5
        let geometry = TransformBox {
            x: 1.0,
            y: 1.0,
            scale_x: 0.008,
            scale_y: 0.5,
            rotation: 10.0,
        };
        assert_eq!(
            state.transform_end(geometry),
            TransformOutcome::Rejected(RejectReason::BelowMinimum)
        );
        assert_eq!(state.placement(), before);
    }

    #[test]
    fn test_transform_at_minimum_is_accepted() {
        let mut state = loaded(100, 100);
        state.select_user();
        let geometry = TransformBox {
            x: 0.0,
            y: 0.0,
            scale_x: 0.05,
            scale_y: 0.05,
            rotation: 0.0,
        };
        assert_eq!(state.transform_end(geometry), TransformOutcome::Applied);
        let (w, h) = state.placement().box_size(100, 100);
        assert!((w - 5.0).abs() < 1e-9);
        assert!((h - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_transform_requires_selection() {
        let mut state = loaded(600, 800);
        let geometry = TransformBox::from(state.placement());
        assert_eq!(
            state.transform_end(geometry),
            TransformOutcome::Rejected(RejectReason::NotSelected)
        );
    }

    #[test]
    fn test_transform_rejects_flip_and_nan() {
        let mut state = loaded(600, 800);
        state.select_user();
        let mut geometry = TransformBox::from(state.placement());
        geometry.scale_x = -0.6;
        assert_eq!(
            state.transform_end(geometry),
            TransformOutcome::Rejected(RejectReason::NonPositiveScale)
        );
        geometry.scale_x = f64::NAN;
        assert_eq!(
            state.transform_end(geometry),
            TransformOutcome::Rejected(RejectReason::NonFinite)
        );
    }

    #[test]
    fn test_transform_without_image() {
        let mut state = TransformState::new(&EditorConfig::default());
        let geometry = TransformBox::from(Placement::default());
        assert_eq!(
            state.transform_end(geometry),
            TransformOutcome::Rejected(RejectReason::NoImage)
        );
    }

    #[test]
    fn test_click_selects_and_deselects() {
        let mut state = loaded(600, 800);
        assert_eq!(state.click(180.0, 320.0), Selection::UserLayer);
        // Margin above the photo is empty canvas
        assert_eq!(state.click(180.0, 40.0), Selection::Deselected);
    }

    #[test]
    fn test_hit_test_never_returns_frame() {
        let state = loaded(600, 800);
        assert_eq!(state.hit_test(180.0, 320.0), Some(Layer::User));
        assert_eq!(state.hit_test(180.0, 40.0), None);

        let empty = TransformState::new(&EditorConfig::default());
        assert_eq!(empty.hit_test(180.0, 320.0), None);
    }

    #[test]
    fn test_select_requires_image() {
        let mut state = TransformState::new(&EditorConfig::default());
        assert_eq!(state.select_user(), Selection::Deselected);
    }

    #[test]
    fn test_new_image_resets_placement() {
        let mut state = loaded(600, 800);
        state.select_user();
        assert!(state.drag_end(5.0, 5.0));
        state.set_zoom(1.5);

        state.reset_for_image(1200, 800);
        let p = state.placement();
        assert_eq!(state.selection(), Selection::Deselected);
        assert!((state.base_scale() - 0.3).abs() < 1e-12);
        // Centred at base * zoom
        assert!((p.scale_x - 0.45).abs() < 1e-12);
        assert!((p.x + 1200.0 * 0.45 / 2.0 - 180.0).abs() < 1e-9);
        assert!((p.y + 800.0 * 0.45 / 2.0 - 320.0).abs() < 1e-9);
    }

    #[test]
    fn test_pending_fit_resolves_once() {
        let mut state = loaded(0, 0);
        assert!(state.fit().is_pending());
        assert_eq!(state.base_scale(), 1.0);

        assert!(state.resolve_dimensions(600, 800));
        assert!(!state.fit().is_pending());
        assert!((state.base_scale() - 0.6).abs() < 1e-12);

        assert!(!state.resolve_dimensions(100, 100));
    }

    #[test]
    fn test_clear() {
        let mut state = loaded(600, 800);
        state.select_user();
        state.clear();
        assert!(!state.has_image());
        assert_eq!(state.selection(), Selection::Deselected);
    }
}
