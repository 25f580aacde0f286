//! Moldura Core - selfie framing engine
//!
//! This crate composites a user's photo under a decorative frame: it
//! decodes and orientation-corrects the photo, fits it into the logical
//! canvas, tracks the user's drag/zoom/rotate edits, paints the two-layer
//! composite and exports it as a PNG.
//!
//! # Module Structure
//!
//! - `config` - Editor configuration (canvas size, zoom range, export ratio)
//! - `decode` - Image decoding with EXIF orientation
//! - `encode` - PNG encoding
//! - `transform` - Orientation correction, fit scale and placement state
//! - `render` - Compositing onto a drawing surface
//! - `export` - Full-resolution PNG export
//! - `capture` - Camera stream lifecycle
//! - `session` - One editing session tying the above together

pub mod capture;
pub mod config;
pub mod decode;
pub mod encode;
pub mod export;
pub mod render;
pub mod session;
pub mod transform;

pub use capture::{
    CameraBackend, CameraConstraints, CameraError, CaptureError, CaptureView, FacingConstraint,
    FacingMode, MediaConstraints, VideoStream,
};
pub use config::{ConfigError, EditorConfig, Viewport, ZoomRange};
pub use decode::{DecodeError, DecodedImage, Orientation};
pub use encode::{encode_png, EncodeError};
pub use export::{export_png, preview_surface, ExportError, ExportedImage};
pub use render::{paint_composite, RasterSurface, RenderSurface, UserLayer};
pub use session::{EditorSession, ImageSource, LoadStatus, RequestToken};
pub use transform::{
    correct_orientation, fit_scale, DeviceOrientation, FitScale, Layer, Placement, Selection,
    TransformBox, TransformOutcome, TransformState,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_to_end_selfie() {
        let config = EditorConfig::default();
        let frame = DecodedImage::solid(360, 640, [0, 0, 0, 0]);
        let mut session = EditorSession::new(config, frame);

        let token = session.begin_load(ImageSource::Camera);
        let still = DecodedImage::solid(1200, 800, [90, 60, 30, 255]);
        let corrected = correct_orientation(&still, DeviceOrientation::from_viewport(375.0, 812.0));
        assert_eq!(
            session.finish_decoded(token, corrected).unwrap(),
            LoadStatus::Applied
        );

        assert_eq!(session.set_zoom(1.5), 1.5);
        let exported = session.export_for_download(1.0).unwrap();
        assert_eq!((exported.width, exported.height), (720, 1280));
    }
}
