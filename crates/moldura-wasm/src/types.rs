//! WASM-compatible wrapper types.

use moldura_core::decode::{DecodeError, DecodedImage};
use moldura_core::transform::Placement;
use wasm_bindgen::prelude::*;

/// A decoded RGBA image for JavaScript.
///
/// Pixels are straight-alpha RGBA, 4 bytes per pixel, row-major. They can
/// be handed to `new ImageData(new Uint8ClampedArray(img.pixels()), w, h)`.
#[wasm_bindgen]
pub struct JsDecodedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsDecodedImage {
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsDecodedImage {
        JsDecodedImage {
            width,
            height,
            pixels,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns a copy of the RGBA pixel data as a Uint8Array.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {}
}

impl JsDecodedImage {
    /// Core image, if the buffer matches the stated size.
    pub(crate) fn try_to_decoded(&self) -> Result<DecodedImage, DecodeError> {
        DecodedImage::try_new(self.width, self.height, self.pixels.clone())
    }
}

impl From<DecodedImage> for JsDecodedImage {
    fn from(image: DecodedImage) -> Self {
        JsDecodedImage::new(image.width, image.height, image.pixels)
    }
}

/// Placement of the user photo in logical canvas units.
///
/// Maps directly onto a Konva-style node: `x`, `y`, `scaleX`, `scaleY`,
/// `rotation` (degrees).
#[wasm_bindgen]
#[derive(Debug, Clone, Copy)]
pub struct JsPlacement {
    inner: Placement,
}

#[wasm_bindgen]
impl JsPlacement {
    #[wasm_bindgen(getter)]
    pub fn x(&self) -> f64 {
        self.inner.x
    }

    #[wasm_bindgen(getter)]
    pub fn y(&self) -> f64 {
        self.inner.y
    }

    #[wasm_bindgen(getter, js_name = scaleX)]
    pub fn scale_x(&self) -> f64 {
        self.inner.scale_x
    }

    #[wasm_bindgen(getter, js_name = scaleY)]
    pub fn scale_y(&self) -> f64 {
        self.inner.scale_y
    }

    #[wasm_bindgen(getter)]
    pub fn rotation(&self) -> f64 {
        self.inner.rotation
    }
}

impl From<Placement> for JsPlacement {
    fn from(inner: Placement) -> Self {
        Self { inner }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_core_type() {
        let img = DecodedImage::solid(2, 3, [1, 2, 3, 4]);
        let js: JsDecodedImage = img.clone().into();
        assert_eq!(js.width(), 2);
        assert_eq!(js.height(), 3);
        assert_eq!(js.byte_length(), 24);
        assert_eq!(js.try_to_decoded().unwrap(), img);
    }

    #[test]
    fn test_short_buffer_is_rejected() {
        let js = JsDecodedImage::new(60, 80, vec![0; 16]);
        assert!(matches!(
            js.try_to_decoded(),
            Err(DecodeError::InvalidPixelData {
                expected: 19200,
                actual: 16
            })
        ));
    }

    #[test]
    fn test_placement_getters() {
        let p = JsPlacement::from(Placement {
            x: 1.0,
            y: 2.0,
            scale_x: 0.5,
            scale_y: 0.75,
            rotation: 30.0,
        });
        assert_eq!((p.x(), p.y()), (1.0, 2.0));
        assert_eq!((p.scale_x(), p.scale_y()), (0.5, 0.75));
        assert_eq!(p.rotation(), 30.0);
    }
}
