//! Camera capture helpers.
//!
//! The page owns the `<video>` element and grabs stills from it; these
//! bindings decide how the device is held and fix up the still's
//! orientation before it is loaded into the editor.

use log::{debug, warn};
use moldura_core::transform::{correct_capture_png, DeviceOrientation};
use wasm_bindgen::prelude::*;

/// A camera still after orientation correction.
#[wasm_bindgen]
pub struct JsCorrectedCapture {
    width: u32,
    height: u32,
    rotated: bool,
    bytes: Vec<u8>,
}

#[wasm_bindgen]
impl JsCorrectedCapture {
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// True if the pixels were turned to portrait.
    #[wasm_bindgen(getter)]
    pub fn rotated(&self) -> bool {
        self.rotated
    }

    /// PNG bytes (or the untouched input when no rotation was needed).
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

/// Rotate a landscape still to portrait if the viewport is portrait.
///
/// # Arguments
///
/// * `bytes` - Encoded still (PNG, JPEG or WebP)
/// * `viewport_width` / `viewport_height` - Current window inner size
#[wasm_bindgen]
pub fn correct_capture_orientation(
    bytes: &[u8],
    viewport_width: f64,
    viewport_height: f64,
) -> Result<JsCorrectedCapture, JsValue> {
    let device = DeviceOrientation::from_viewport(viewport_width, viewport_height);
    let corrected = correct_capture_png(bytes, device).map_err(|e| {
        warn!("capture orientation correction failed: {}", e);
        JsValue::from_str(&e.to_string())
    })?;

    if corrected.rotated {
        debug!(
            "capture rotated to {}x{}",
            corrected.width, corrected.height
        );
    }
    Ok(JsCorrectedCapture {
        width: corrected.width,
        height: corrected.height,
        rotated: corrected.rotated,
        bytes: corrected.bytes,
    })
}

/// `"portrait"` or `"landscape"`, from the window's inner size.
#[wasm_bindgen]
pub fn device_orientation() -> String {
    orientation_label(current_device_orientation()).to_string()
}

fn current_device_orientation() -> DeviceOrientation {
    let size = web_sys::window().and_then(|w| {
        let width = w.inner_width().ok()?.as_f64()?;
        let height = w.inner_height().ok()?.as_f64()?;
        Some((width, height))
    });
    match size {
        Some((width, height)) => DeviceOrientation::from_viewport(width, height),
        None => DeviceOrientation::Landscape,
    }
}

fn orientation_label(orientation: DeviceOrientation) -> &'static str {
    match orientation {
        DeviceOrientation::Portrait => "portrait",
        DeviceOrientation::Landscape => "landscape",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moldura_core::decode::{decode_image, DecodedImage};
    use moldura_core::encode::encode_png;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = DecodedImage::solid(width, height, [10, 20, 30, 255]);
        encode_png(&img.pixels, width, height).unwrap()
    }

    #[test]
    fn test_landscape_still_on_phone_is_rotated() {
        let result = correct_capture_orientation(&png(12, 8), 375.0, 812.0).unwrap();
        assert!(result.rotated());
        assert_eq!((result.width(), result.height()), (8, 12));

        let decoded = decode_image(&result.bytes()).unwrap();
        assert_eq!((decoded.width, decoded.height), (8, 12));
    }

    #[test]
    fn test_still_on_desktop_is_untouched() {
        let input = png(12, 8);
        let result = correct_capture_orientation(&input, 1280.0, 720.0).unwrap();
        assert!(!result.rotated());
        assert_eq!(result.bytes(), input);
    }

    #[test]
    fn test_orientation_label() {
        assert_eq!(orientation_label(DeviceOrientation::Portrait), "portrait");
        assert_eq!(orientation_label(DeviceOrientation::Landscape), "landscape");
    }
}
