//! Orientation correction for camera captures.
//!
//! Mobile cameras frequently hand back a landscape frame while the phone is
//! held upright. When a landscape capture arrives on a portrait device the
//! pixels are turned 90° counter-clockwise about the centre so the selfie is
//! upright before fitting. The decision is a width/height heuristic: EXIF
//! metadata is not consulted on this path (screenshots of the video stream
//! carry none).

use log::debug;
use thiserror::Error;

use crate::decode::{decode_image_no_orientation, DecodeError, DecodedImage};
use crate::encode::{encode_png, EncodeError};

/// Orientation of the viewing device's viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceOrientation {
    Portrait,
    Landscape,
}

impl DeviceOrientation {
    /// Portrait if the viewport is taller than it is wide, else landscape.
    pub fn from_viewport(width: f64, height: f64) -> Self {
        if height > width {
            DeviceOrientation::Portrait
        } else {
            DeviceOrientation::Landscape
        }
    }
}

/// Errors from [`correct_capture_png`].
#[derive(Debug, Error)]
pub enum CorrectionError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("Failed to re-encode corrected capture: {0}")]
    Encode(#[from] EncodeError),
}

/// A capture after orientation correction, re-encoded as PNG.
#[derive(Debug, Clone)]
pub struct CorrectedCapture {
    pub width: u32,
    pub height: u32,
    /// Whether the pixels were rotated.
    pub rotated: bool,
    pub bytes: Vec<u8>,
}

/// Whether an image of the given size must be rotated on this device.
pub fn needs_rotation(width: u32, height: u32, device: DeviceOrientation) -> bool {
    width > height && device == DeviceOrientation::Portrait
}

/// Rotate a landscape capture to portrait when the device is upright.
///
/// The rotation is exact (no resampling) and swaps width and height. Any
/// other combination returns a copy of the input.
pub fn correct_orientation(image: &DecodedImage, device: DeviceOrientation) -> DecodedImage {
    if !needs_rotation(image.width, image.height, device) {
        return image.clone();
    }
    rotate_ccw(image)
}

/// Decode a raw capture, correct its orientation, and re-encode it as PNG.
///
/// When no rotation is needed the original bytes are returned untouched.
pub fn correct_capture_png(
    bytes: &[u8],
    device: DeviceOrientation,
) -> Result<CorrectedCapture, CorrectionError> {
    let image = decode_image_no_orientation(bytes)?;

    if !needs_rotation(image.width, image.height, device) {
        return Ok(CorrectedCapture {
            width: image.width,
            height: image.height,
            rotated: false,
            bytes: bytes.to_vec(),
        });
    }

    let rotated = rotate_ccw(&image);
    let bytes = encode_png(&rotated.pixels, rotated.width, rotated.height)?;
    Ok(CorrectedCapture {
        width: rotated.width,
        height: rotated.height,
        rotated: true,
        bytes,
    })
}

/// Flip an image left to right.
///
/// Front-camera previews are shown mirrored; stills taken from them are
/// flipped the same way so the photo matches what the user saw.
pub fn mirror_horizontal(image: &DecodedImage) -> DecodedImage {
    let row = image.width as usize * 4;
    let mut pixels = Vec::with_capacity(image.pixels.len());
    if row > 0 {
        for line in image.pixels.chunks_exact(row) {
            for px in line.chunks_exact(4).rev() {
                pixels.extend_from_slice(px);
            }
        }
    }
    DecodedImage::new(image.width, image.height, pixels)
}

/// Rotate 90° counter-clockwise.
///
/// Destination pixel (x, y) takes source pixel (w - 1 - y, x).
fn rotate_ccw(image: &DecodedImage) -> DecodedImage {
    let (src_w, src_h) = (image.width, image.height);
    let (dst_w, dst_h) = (src_h, src_w);
    let mut output = vec![0u8; image.pixels.len()];

    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            let src_x = src_w - 1 - dst_y;
            let src_y = dst_x;
            let src_idx = ((src_y * src_w + src_x) * 4) as usize;
            let dst_idx = ((dst_y * dst_w + dst_x) * 4) as usize;
            output[dst_idx..dst_idx + 4].copy_from_slice(&image.pixels[src_idx..src_idx + 4]);
        }
    }

    debug!("rotated capture {}x{} -> {}x{}", src_w, src_h, dst_w, dst_h);
    DecodedImage::new(dst_w, dst_h, output)
}
