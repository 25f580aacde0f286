//! Export of the composite as a downloadable PNG.
//!
//! The page shows the logical canvas at some responsive display scale. The
//! export ratio is taken relative to that on-screen size
//! (`effective = requested / display_scale`), so the exported bitmap is
//! `W * requested` by `H * requested` whatever the window size.

use log::info;
use thiserror::Error;

use crate::config::{EditorConfig, Viewport};
use crate::decode::DecodedImage;
use crate::encode::{encode_png, EncodeError};
use crate::render::{paint_composite, RasterSurface, UserLayer};

/// Errors that can occur while exporting.
#[derive(Debug, Error)]
pub enum ExportError {
    /// No user photo has been placed yet.
    #[error("Nothing to export: no photo on the canvas")]
    EmptySurface,

    /// Requested ratio or display scale is zero, negative or not finite.
    #[error("Degenerate export scale: pixel ratio {requested}, display scale {display_scale}")]
    DegenerateScale { requested: f64, display_scale: f64 },

    /// Output would be empty or larger than the configured limit.
    #[error("Invalid export size {width}x{height} (limit {max_edge})")]
    InvalidSize { width: u32, height: u32, max_edge: u32 },

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

impl ExportError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ExportError::EmptySurface => "Escolha uma foto antes de baixar.",
            _ => "Não foi possível gerar a imagem. Tente novamente.",
        }
    }
}

/// A finished composite, ready to be offered for download.
#[derive(Debug, Clone)]
pub struct ExportedImage {
    pub width: u32,
    pub height: u32,
    pub file_name: String,
    /// PNG-encoded bytes.
    pub bytes: Vec<u8>,
}

/// Pixel ratio applied to the on-screen surface: `requested / display_scale`.
pub fn effective_pixel_ratio(requested: f64, display_scale: f64) -> Result<f64, ExportError> {
    let degenerate = ExportError::DegenerateScale {
        requested,
        display_scale,
    };
    if !(requested.is_finite() && display_scale.is_finite()) {
        return Err(degenerate);
    }
    if requested <= 0.0 || display_scale <= 0.0 {
        return Err(degenerate);
    }
    Ok(requested / display_scale)
}

/// Exported bitmap size for the given ratio and display scale.
///
/// The on-screen surface measures `W * display_scale`; multiplying by the
/// effective ratio cancels the display scale.
pub fn export_dimensions(
    viewport: Viewport,
    requested: f64,
    display_scale: f64,
    max_edge: u32,
) -> Result<(u32, u32), ExportError> {
    let ratio = effective_pixel_ratio(requested, display_scale)?;
    let width = (viewport.width * display_scale * ratio).round();
    let height = (viewport.height * display_scale * ratio).round();

    let invalid = ExportError::InvalidSize {
        width: width.clamp(0.0, u32::MAX as f64) as u32,
        height: height.clamp(0.0, u32::MAX as f64) as u32,
        max_edge,
    };
    if width < 1.0 || height < 1.0 || width > max_edge as f64 || height > max_edge as f64 {
        return Err(invalid);
    }
    Ok((width as u32, height as u32))
}

/// A blank preview surface at `pixel_ratio`, held to the export size limit.
pub fn preview_surface(
    config: &EditorConfig,
    pixel_ratio: f64,
) -> Result<RasterSurface, ExportError> {
    export_dimensions(config.viewport, pixel_ratio, 1.0, config.max_export_edge)?;
    Ok(RasterSurface::for_viewport(config.viewport, pixel_ratio))
}

/// Render the composite at the requested ratio and encode it as PNG.
pub fn export_png(
    frame: &DecodedImage,
    user: Option<UserLayer<'_>>,
    config: &EditorConfig,
    requested: f64,
    display_scale: f64,
) -> Result<ExportedImage, ExportError> {
    let Some(user) = user else {
        return Err(ExportError::EmptySurface);
    };

    let (width, height) = export_dimensions(
        config.viewport,
        requested,
        display_scale,
        config.max_export_edge,
    )?;

    // The surface's own ratio maps logical units onto the exported pixels
    let device_ratio = width as f64 / config.viewport.width;
    let mut surface = RasterSurface::new(width, height, device_ratio);
    paint_composite(&mut surface, Some(user), frame, config.viewport);

    let bytes = encode_png(surface.pixels(), width, height)?;
    info!(
        "exported {}x{} composite ({} bytes)",
        width,
        height,
        bytes.len()
    );

    Ok(ExportedImage {
        width,
        height,
        file_name: config.download_file_name.clone(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_image;
    use crate::transform::Placement;

    fn small_config() -> EditorConfig {
        EditorConfig {
            viewport: Viewport::new(36.0, 64.0),
            ..EditorConfig::default()
        }
    }

    #[test]
    fn test_effective_ratio() {
        assert_eq!(effective_pixel_ratio(2.0, 1.0).unwrap(), 2.0);
        assert_eq!(effective_pixel_ratio(2.0, 0.5).unwrap(), 4.0);
    }

    #[test]
    fn test_effective_ratio_degenerate() {
        for (r, s) in [(0.0, 1.0), (-1.0, 1.0), (2.0, 0.0), (2.0, -0.5), (f64::NAN, 1.0)] {
            assert!(matches!(
                effective_pixel_ratio(r, s),
                Err(ExportError::DegenerateScale { .. })
            ));
        }
    }

    #[test]
    fn test_dimensions_invariant_to_display_scale() {
        let viewport = Viewport::new(360.0, 640.0);
        let at_half = export_dimensions(viewport, 2.0, 0.5, 8192).unwrap();
        let at_one = export_dimensions(viewport, 2.0, 1.0, 8192).unwrap();
        let at_odd = export_dimensions(viewport, 2.0, 0.37, 8192).unwrap();
        assert_eq!(at_half, (720, 1280));
        assert_eq!(at_one, (720, 1280));
        assert_eq!(at_odd, (720, 1280));
    }

    #[test]
    fn test_dimensions_scale_linearly() {
        let viewport = Viewport::new(360.0, 640.0);
        assert_eq!(export_dimensions(viewport, 1.0, 1.0, 8192).unwrap(), (360, 640));
        assert_eq!(export_dimensions(viewport, 3.0, 1.0, 8192).unwrap(), (1080, 1920));
    }

    #[test]
    fn test_dimensions_limit() {
        let viewport = Viewport::new(360.0, 640.0);
        assert!(matches!(
            export_dimensions(viewport, 20.0, 1.0, 8192),
            Err(ExportError::InvalidSize { .. })
        ));
        assert!(matches!(
            export_dimensions(viewport, 0.0001, 1.0, 8192),
            Err(ExportError::InvalidSize { .. })
        ));
    }

    #[test]
    fn test_preview_surface_checks_ratio() {
        let config = small_config();
        let surface = preview_surface(&config, 2.0).unwrap();
        assert_eq!(surface.dimensions(), (72, 128));

        for ratio in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                preview_surface(&config, ratio),
                Err(ExportError::DegenerateScale { .. })
            ));
        }
        assert!(matches!(
            preview_surface(&config, 1e9),
            Err(ExportError::InvalidSize { .. })
        ));
    }

    #[test]
    fn test_export_without_photo_fails() {
        let frame = DecodedImage::solid(4, 4, [0, 0, 0, 0]);
        let result = export_png(&frame, None, &small_config(), 2.0, 1.0);
        assert!(matches!(result, Err(ExportError::EmptySurface)));
        assert_eq!(
            ExportError::EmptySurface.user_message(),
            "Escolha uma foto antes de baixar."
        );
    }

    #[test]
    fn test_export_produces_png_of_expected_size() {
        let config = small_config();
        let frame = DecodedImage::solid(9, 16, [0, 0, 0, 0]);
        let user = DecodedImage::solid(36, 64, [200, 10, 10, 255]);

        let exported = export_png(
            &frame,
            Some(UserLayer {
                image: &user,
                placement: Placement::default(),
            }),
            &config,
            2.0,
            0.5,
        )
        .unwrap();

        assert_eq!((exported.width, exported.height), (72, 128));
        assert_eq!(exported.file_name, "minha-foto-com-moldura.png");

        let decoded = decode_image(&exported.bytes).unwrap();
        assert_eq!((decoded.width, decoded.height), (72, 128));
        assert_eq!(decoded.pixel(36, 64), [200, 10, 10, 255]);
    }

    #[test]
    fn test_export_degenerate_display_scale() {
        let config = small_config();
        let frame = DecodedImage::solid(9, 16, [0, 0, 0, 0]);
        let user = DecodedImage::solid(4, 4, [1, 1, 1, 255]);
        let result = export_png(
            &frame,
            Some(UserLayer {
                image: &user,
                placement: Placement::default(),
            }),
            &config,
            2.0,
            0.0,
        );
        assert!(matches!(result, Err(ExportError::DegenerateScale { .. })));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Output size depends only on the requested ratio.
        #[test]
        fn prop_display_scale_invariance(
            ratio in 0.5f64..4.0,
            scale_a in 0.05f64..3.0,
            scale_b in 0.05f64..3.0,
        ) {
            let viewport = Viewport::new(360.0, 640.0);
            let a = export_dimensions(viewport, ratio, scale_a, 8192).unwrap();
            let b = export_dimensions(viewport, ratio, scale_b, 8192).unwrap();
            prop_assert_eq!(a, b);
            prop_assert_eq!(a, ((360.0 * ratio).round() as u32, (640.0 * ratio).round() as u32));
        }
    }
}
