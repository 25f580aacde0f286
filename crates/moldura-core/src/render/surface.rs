//! Drawing surfaces.
//!
//! [`RenderSurface`] is the seam between the compositor and whatever paints
//! pixels. [`RasterSurface`] is the CPU implementation used for export: an
//! RGBA buffer at `viewport * pixel_ratio` that draws images through an
//! affine transform.
//!
//! # Algorithm
//!
//! Drawing uses inverse mapping: for each destination pixel inside the
//! transformed image's bounds, the pixel centre is mapped back into source
//! space and sampled bilinearly on premultiplied colour, then blended
//! source-over onto the buffer.

use super::Affine;
use crate::config::Viewport;
use crate::decode::DecodedImage;

/// A 2D drawing surface addressed in logical viewport units.
pub trait RenderSurface {
    /// Logical size `(width, height)`.
    fn logical_size(&self) -> (f64, f64);

    /// Device pixels per logical unit.
    fn pixel_ratio(&self) -> f64;

    /// Draw `image` with `transform` mapping image pixels to logical units.
    fn draw_image(&mut self, image: &DecodedImage, transform: &Affine);
}

/// CPU raster surface backed by an RGBA buffer.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    logical_width: f64,
    logical_height: f64,
    pixel_ratio: f64,
    buffer: image::RgbaImage,
}

impl RasterSurface {
    /// Create a transparent surface of `width x height` device pixels.
    pub fn new(width: u32, height: u32, pixel_ratio: f64) -> Self {
        Self {
            logical_width: width as f64 / pixel_ratio,
            logical_height: height as f64 / pixel_ratio,
            pixel_ratio,
            buffer: image::RgbaImage::new(width, height),
        }
    }

    /// Create a surface covering `viewport` at `pixel_ratio`.
    ///
    /// Device dimensions are rounded and never below 1x1.
    pub fn for_viewport(viewport: Viewport, pixel_ratio: f64) -> Self {
        let width = ((viewport.width * pixel_ratio).round() as u32).max(1);
        let height = ((viewport.height * pixel_ratio).round() as u32).max(1);
        Self {
            logical_width: viewport.width,
            logical_height: viewport.height,
            pixel_ratio,
            buffer: image::RgbaImage::new(width, height),
        }
    }

    /// Device pixel dimensions.
    pub fn dimensions(&self) -> (u32, u32) {
        self.buffer.dimensions()
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.buffer.get_pixel(x, y).0
    }

    pub fn pixels(&self) -> &[u8] {
        self.buffer.as_raw()
    }

    pub fn into_image(self) -> DecodedImage {
        DecodedImage::from_rgba_image(self.buffer)
    }
}

impl RenderSurface for RasterSurface {
    fn logical_size(&self) -> (f64, f64) {
        (self.logical_width, self.logical_height)
    }

    fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn draw_image(&mut self, image: &DecodedImage, transform: &Affine) {
        if image.validate().is_err() {
            return;
        }

        let device = transform.then(&Affine::scale(self.pixel_ratio, self.pixel_ratio));
        let Some(inverse) = device.invert() else {
            return;
        };

        let (buf_w, buf_h) = self.buffer.dimensions();
        let Some((x0, y0, x1, y1)) = device_bounds(&device, image, buf_w, buf_h) else {
            return;
        };

        let (src_w, src_h) = (image.width as f64, image.height as f64);
        for py in y0..y1 {
            for px in x0..x1 {
                let (u, v) = inverse.apply(px as f64 + 0.5, py as f64 + 0.5);
                if u < 0.0 || v < 0.0 || u >= src_w || v >= src_h {
                    continue;
                }
                let src = sample_bilinear_premultiplied(image, u - 0.5, v - 0.5);
                let dst = self.buffer.get_pixel_mut(px, py);
                dst.0 = blend_source_over(src, dst.0);
            }
        }
    }
}

/// Device-pixel rectangle `[x0, x1) x [y0, y1)` covered by the drawn image.
fn device_bounds(
    device: &Affine,
    image: &DecodedImage,
    buf_w: u32,
    buf_h: u32,
) -> Option<(u32, u32, u32, u32)> {
    let (w, h) = (image.width as f64, image.height as f64);
    let corners = [
        device.apply(0.0, 0.0),
        device.apply(w, 0.0),
        device.apply(0.0, h),
        device.apply(w, h),
    ];
    let min_x = corners.iter().map(|c| c.0).fold(f64::INFINITY, f64::min);
    let max_x = corners.iter().map(|c| c.0).fold(f64::NEG_INFINITY, f64::max);
    let min_y = corners.iter().map(|c| c.1).fold(f64::INFINITY, f64::min);
    let max_y = corners.iter().map(|c| c.1).fold(f64::NEG_INFINITY, f64::max);

    if !(min_x.is_finite() && max_x.is_finite() && min_y.is_finite() && max_y.is_finite()) {
        return None;
    }

    let x0 = min_x.floor().clamp(0.0, buf_w as f64) as u32;
    let x1 = max_x.ceil().clamp(0.0, buf_w as f64) as u32;
    let y0 = min_y.floor().clamp(0.0, buf_h as f64) as u32;
    let y1 = max_y.ceil().clamp(0.0, buf_h as f64) as u32;

    (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
}

/// Get a pixel as premultiplied `[r, g, b, a]` in 0..=1, clamping to the edge.
#[inline]
fn premultiplied_at(image: &DecodedImage, x: i64, y: i64) -> [f32; 4] {
    let px = x.clamp(0, image.width as i64 - 1) as u32;
    let py = y.clamp(0, image.height as i64 - 1) as u32;
    let [r, g, b, a] = image.pixel(px, py);
    let alpha = a as f32 / 255.0;
    [
        r as f32 / 255.0 * alpha,
        g as f32 / 255.0 * alpha,
        b as f32 / 255.0 * alpha,
        alpha,
    ]
}

/// Bilinear sample at continuous pixel coordinates (pixel centres at integers).
fn sample_bilinear_premultiplied(image: &DecodedImage, x: f64, y: f64) -> [f32; 4] {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = (x - x0) as f32;
    let fy = (y - y0) as f32;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let p00 = premultiplied_at(image, x0, y0);
    let p10 = premultiplied_at(image, x0 + 1, y0);
    let p01 = premultiplied_at(image, x0, y0 + 1);
    let p11 = premultiplied_at(image, x0 + 1, y0 + 1);

    let mut result = [0.0f32; 4];
    for i in 0..4 {
        result[i] = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
    }
    result
}

/// Porter-Duff source-over of a premultiplied source onto a straight-alpha pixel.
fn blend_source_over(src: [f32; 4], dst: [u8; 4]) -> [u8; 4] {
    let src_a = src[3];
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    if out_a <= 0.0 {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    for i in 0..3 {
        let dst_c = dst[i] as f32 / 255.0 * dst_a;
        let c = (src[i] + dst_c * (1.0 - src_a)) / out_a;
        out[i] = (c * 255.0).clamp(0.0, 255.0).round() as u8;
    }
    out[3] = (out_a * 255.0).clamp(0.0, 255.0).round() as u8;
    out
}
