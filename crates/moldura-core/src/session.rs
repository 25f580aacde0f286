//! Editing session: one frame, at most one user photo, one placement.
//!
//! Photo loads are two-phase. [`EditorSession::begin_load`] hands out a
//! [`RequestToken`]; the caller decodes asynchronously and comes back with
//! the token. Only the most recent token is honoured, so a slow decode that
//! finishes after the user picked another photo is dropped as
//! [`LoadStatus::Stale`].

use log::{debug, info};

use crate::config::EditorConfig;
use crate::decode::{decode_image, decode_image_no_orientation, DecodeError, DecodedImage};
use crate::export::{export_png, preview_surface, ExportError, ExportedImage};
use crate::render::{paint_composite, RasterSurface, UserLayer};
use crate::transform::{
    correct_orientation, mirror_horizontal, DeviceOrientation, Placement, Selection, TransformBox,
    TransformOutcome, TransformState,
};

/// Where a photo came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    File,
    Camera,
}

/// Identity of a load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken {
    id: u64,
    source: ImageSource,
}

impl RequestToken {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn source(&self) -> ImageSource {
        self.source
    }
}

/// Outcome of finishing a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// The photo replaced the previous one.
    Applied,
    /// A newer request superseded this one; the result was discarded.
    Stale,
}

pub struct EditorSession {
    config: EditorConfig,
    frame: DecodedImage,
    user: Option<DecodedImage>,
    transform: TransformState,
    next_request: u64,
    latest: Option<RequestToken>,
}

impl EditorSession {
    pub fn new(config: EditorConfig, frame: DecodedImage) -> Self {
        let transform = TransformState::new(&config);
        Self {
            config,
            frame,
            user: None,
            transform,
            next_request: 0,
            latest: None,
        }
    }

    /// Create a session, decoding the bundled frame asset.
    pub fn from_frame_bytes(config: EditorConfig, frame: &[u8]) -> Result<Self, DecodeError> {
        let frame = decode_image_no_orientation(frame)?;
        debug!("frame asset decoded: {}x{}", frame.width, frame.height);
        Ok(Self::new(config, frame))
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn frame(&self) -> &DecodedImage {
        &self.frame
    }

    pub fn user_image(&self) -> Option<&DecodedImage> {
        self.user.as_ref()
    }

    pub fn transform(&self) -> &TransformState {
        &self.transform
    }

    /// Start loading a photo. Any earlier pending request becomes stale.
    pub fn begin_load(&mut self, source: ImageSource) -> RequestToken {
        self.next_request += 1;
        let token = RequestToken {
            id: self.next_request,
            source,
        };
        self.latest = Some(token);
        token
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest == Some(token)
    }

    /// Finish a file-pick load: decode with EXIF orientation applied.
    pub fn finish_file(
        &mut self,
        token: RequestToken,
        bytes: &[u8],
    ) -> Result<LoadStatus, DecodeError> {
        if !self.is_current(token) {
            return Ok(self.stale(token));
        }
        let image = decode_image(bytes)?;
        Ok(self.accept(token, image))
    }

    /// Finish a camera load from a raw video still.
    ///
    /// The still is mirrored when the camera preview is, then its
    /// orientation is corrected.
    pub fn finish_capture(
        &mut self,
        token: RequestToken,
        bytes: &[u8],
        device: DeviceOrientation,
    ) -> Result<LoadStatus, DecodeError> {
        if !self.is_current(token) {
            return Ok(self.stale(token));
        }
        let mut image = decode_image_no_orientation(bytes)?;
        if self.config.camera.mirrored {
            image = mirror_horizontal(&image);
        }
        Ok(self.accept(token, correct_orientation(&image, device)))
    }

    /// Finish a load with an image the caller already decoded.
    ///
    /// The buffer is checked against the stated size; a malformed image
    /// is rejected and the current photo kept.
    pub fn finish_decoded(
        &mut self,
        token: RequestToken,
        image: DecodedImage,
    ) -> Result<LoadStatus, DecodeError> {
        if !self.is_current(token) {
            return Ok(self.stale(token));
        }
        image.validate()?;
        Ok(self.accept(token, image))
    }

    fn stale(&self, token: RequestToken) -> LoadStatus {
        debug!(
            "ignoring stale {:?} load #{} (latest #{})",
            token.source,
            token.id,
            self.latest.map_or(0, |t| t.id)
        );
        LoadStatus::Stale
    }

    fn accept(&mut self, token: RequestToken, image: DecodedImage) -> LoadStatus {
        if self.user.is_some() {
            debug!("replacing previous photo");
        }
        info!(
            "{:?} photo accepted: {}x{}",
            token.source, image.width, image.height
        );
        self.transform.reset_for_image(image.width, image.height);
        self.user = Some(image);
        self.latest = None;
        LoadStatus::Applied
    }

    /// Drop the photo and any pending request.
    pub fn reset(&mut self) {
        self.user = None;
        self.latest = None;
        self.transform.clear();
    }

    pub fn set_zoom(&mut self, value: f64) -> f64 {
        self.transform.set_zoom(value)
    }

    pub fn drag_end(&mut self, x: f64, y: f64) -> bool {
        self.transform.drag_end(x, y)
    }

    pub fn transform_end(&mut self, geometry: TransformBox) -> TransformOutcome {
        self.transform.transform_end(geometry)
    }

    pub fn click(&mut self, x: f64, y: f64) -> Selection {
        self.transform.click(x, y)
    }

    pub fn select_user(&mut self) -> Selection {
        self.transform.select_user()
    }

    pub fn deselect(&mut self) {
        self.transform.deselect()
    }

    pub fn placement(&self) -> Option<Placement> {
        self.user.as_ref().map(|_| self.transform.placement())
    }

    fn user_layer(&self) -> Option<UserLayer<'_>> {
        self.user.as_ref().map(|image| UserLayer {
            image,
            placement: self.transform.placement(),
        })
    }

    /// Paint the composite at `pixel_ratio` for preview.
    ///
    /// The ratio must be positive and finite, and the surface must fit
    /// within `max_export_edge`.
    pub fn render(&self, pixel_ratio: f64) -> Result<RasterSurface, ExportError> {
        let mut surface = preview_surface(&self.config, pixel_ratio)?;
        paint_composite(
            &mut surface,
            self.user_layer(),
            &self.frame,
            self.config.viewport,
        );
        Ok(surface)
    }

    /// Export at an explicit pixel ratio.
    pub fn export(
        &self,
        requested_ratio: f64,
        display_scale: f64,
    ) -> Result<ExportedImage, ExportError> {
        export_png(
            &self.frame,
            self.user_layer(),
            &self.config,
            requested_ratio,
            display_scale,
        )
    }

    /// Export at the configured download ratio.
    pub fn export_for_download(&self, display_scale: f64) -> Result<ExportedImage, ExportError> {
        self.export(self.config.export_pixel_ratio, display_scale)
    }
}
