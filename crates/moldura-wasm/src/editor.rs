//! WASM bindings for the editing session.
//!
//! # Usage
//!
//! ```typescript
//! const editor = new JsEditor(frameBytes, { export_pixel_ratio: 2 });
//!
//! const token = editor.begin_file_load();
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! if (editor.load_file(token, bytes)) {
//!   const p = editor.placement();
//!   node.position({ x: p.x, y: p.y });
//! }
//!
//! offer_download(editor.export_png(stage.scaleX()), editor.download_file_name);
//! ```

use log::warn;
use moldura_core::config::{EditorConfig, Viewport};
use moldura_core::session::{EditorSession, ImageSource, LoadStatus, RequestToken};
use moldura_core::transform::{DeviceOrientation, Selection, TransformBox, TransformOutcome};
use wasm_bindgen::prelude::*;

use crate::download::offer_download;
use crate::types::{JsDecodedImage, JsPlacement};

/// Handle for a photo load started with `begin_file_load`/`begin_camera_load`.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy)]
pub struct JsLoadToken {
    inner: RequestToken,
}

#[wasm_bindgen]
impl JsLoadToken {
    #[wasm_bindgen(getter)]
    pub fn id(&self) -> f64 {
        self.inner.id() as f64
    }
}

/// One framing session: the frame, the user's photo and its placement.
#[wasm_bindgen]
pub struct JsEditor {
    session: EditorSession,
}

#[wasm_bindgen]
impl JsEditor {
    /// Create an editor from the encoded frame asset.
    ///
    /// # Arguments
    ///
    /// * `frame_bytes` - PNG of the decorative frame (transparency preserved)
    /// * `config` - Optional partial configuration object; missing fields
    ///   take their defaults
    #[wasm_bindgen(constructor)]
    pub fn new(frame_bytes: &[u8], config: JsValue) -> Result<JsEditor, JsValue> {
        let config: EditorConfig = if config.is_undefined() || config.is_null() {
            EditorConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?
        };
        config
            .validate()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let session = EditorSession::from_frame_bytes(config, frame_bytes)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(JsEditor { session })
    }

    /// Logical canvas width.
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> f64 {
        self.viewport().width
    }

    /// Logical canvas height.
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> f64 {
        self.viewport().height
    }

    #[wasm_bindgen(getter)]
    pub fn download_file_name(&self) -> String {
        self.session.config().download_file_name.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn has_photo(&self) -> bool {
        self.session.user_image().is_some()
    }

    pub fn begin_file_load(&mut self) -> JsLoadToken {
        JsLoadToken {
            inner: self.session.begin_load(ImageSource::File),
        }
    }

    pub fn begin_camera_load(&mut self) -> JsLoadToken {
        JsLoadToken {
            inner: self.session.begin_load(ImageSource::Camera),
        }
    }

    /// Finish a file-pick load. Returns false if a newer load superseded it.
    ///
    /// On failure the error carries the message to show the user.
    pub fn load_file(&mut self, token: &JsLoadToken, bytes: &[u8]) -> Result<bool, JsValue> {
        match self.session.finish_file(token.inner, bytes) {
            Ok(status) => Ok(status == LoadStatus::Applied),
            Err(e) => {
                warn!("photo could not be loaded: {}", e);
                Err(JsValue::from_str(e.user_message()))
            }
        }
    }

    /// Finish a camera load with the raw still grabbed from the video.
    ///
    /// The still is mirrored to match the preview when the camera config
    /// says so; pass the unflipped frame.
    pub fn load_capture(
        &mut self,
        token: &JsLoadToken,
        bytes: &[u8],
        viewport_width: f64,
        viewport_height: f64,
    ) -> Result<bool, JsValue> {
        let device = DeviceOrientation::from_viewport(viewport_width, viewport_height);
        match self.session.finish_capture(token.inner, bytes, device) {
            Ok(status) => Ok(status == LoadStatus::Applied),
            Err(e) => {
                warn!("capture could not be loaded: {}", e);
                Err(JsValue::from_str(e.user_message()))
            }
        }
    }

    /// Finish a load with pixels the page already decoded.
    ///
    /// Fails if the buffer length does not match `width * height * 4`.
    pub fn load_decoded(
        &mut self,
        token: &JsLoadToken,
        image: &JsDecodedImage,
    ) -> Result<bool, JsValue> {
        let loaded = image
            .try_to_decoded()
            .and_then(|decoded| self.session.finish_decoded(token.inner, decoded));
        match loaded {
            Ok(status) => Ok(status == LoadStatus::Applied),
            Err(e) => {
                warn!("decoded pixels rejected: {}", e);
                Err(JsValue::from_str(e.user_message()))
            }
        }
    }

    /// Apply a zoom slider value; returns the multiplier actually used.
    pub fn set_zoom(&mut self, value: f64) -> f64 {
        self.session.set_zoom(value)
    }

    #[wasm_bindgen(getter)]
    pub fn zoom(&self) -> f64 {
        self.session.transform().zoom()
    }

    pub fn drag_end(&mut self, x: f64, y: f64) -> bool {
        self.session.drag_end(x, y)
    }

    /// Apply the geometry reported by the transform handle.
    ///
    /// Returns false if the edit was rejected; the placement is then
    /// unchanged and the page should snap its node back to `placement()`.
    pub fn transform_end(
        &mut self,
        x: f64,
        y: f64,
        scale_x: f64,
        scale_y: f64,
        rotation: f64,
    ) -> bool {
        let outcome = self.session.transform_end(TransformBox {
            x,
            y,
            scale_x,
            scale_y,
            rotation,
        });
        outcome == TransformOutcome::Applied
    }

    /// Handle a click on the canvas. Returns true if the photo is now selected.
    pub fn click(&mut self, x: f64, y: f64) -> bool {
        self.session.click(x, y) == Selection::UserLayer
    }

    pub fn select_photo(&mut self) -> bool {
        self.session.select_user() == Selection::UserLayer
    }

    pub fn deselect(&mut self) {
        self.session.deselect()
    }

    /// Current placement, or `undefined` without a photo.
    pub fn placement(&self) -> Option<JsPlacement> {
        self.session.placement().map(JsPlacement::from)
    }

    /// Render the composite at `pixel_ratio` as RGBA pixels.
    pub fn render(&self, pixel_ratio: f64) -> Result<JsDecodedImage, JsValue> {
        match self.session.render(pixel_ratio) {
            Ok(surface) => Ok(surface.into_image().into()),
            Err(e) => {
                warn!("preview render failed: {}", e);
                Err(JsValue::from_str(e.user_message()))
            }
        }
    }

    /// `getUserMedia` constraints for the configured camera.
    pub fn media_constraints(&self) -> Result<JsValue, JsValue> {
        let constraints = self.session.config().camera.media_constraints();
        serde_wasm_bindgen::to_value(&constraints)
            .map_err(|e| JsValue::from_str(&format!("Invalid camera constraints: {}", e)))
    }

    /// Export the composite as PNG bytes at the configured ratio.
    ///
    /// `display_scale` is the on-screen scale of the canvas (the stage's
    /// `scaleX()`); output size does not depend on it.
    pub fn export_png(&self, display_scale: f64) -> Result<Vec<u8>, JsValue> {
        match self.session.export_for_download(display_scale) {
            Ok(exported) => Ok(exported.bytes),
            Err(e) => {
                warn!("export failed: {}", e);
                Err(JsValue::from_str(e.user_message()))
            }
        }
    }

    /// Export and immediately offer the PNG as a download.
    pub fn download(&self, display_scale: f64) -> Result<(), JsValue> {
        let bytes = self.export_png(display_scale)?;
        offer_download(&bytes, &self.session.config().download_file_name)
    }

    /// Drop the photo and any pending load.
    pub fn reset(&mut self) {
        self.session.reset()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {}
}

impl JsEditor {
    fn viewport(&self) -> Viewport {
        self.session.config().viewport
    }
}

impl From<EditorSession> for JsEditor {
    fn from(session: EditorSession) -> Self {
        JsEditor { session }
    }
}
