//! Camera capture lifecycle.
//!
//! The camera stream is a scoped resource: it is acquired when the capture
//! view opens and released exactly once, on close, on a successful capture,
//! or when the view is dropped. Platform access goes through the
//! [`CameraBackend`] and [`VideoStream`] traits.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::{decode_image_no_orientation, DecodeError, DecodedImage};
use crate::transform::{correct_orientation, mirror_horizontal, DeviceOrientation};

/// Failure to acquire the camera.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CameraError {
    #[error("Camera permission denied")]
    PermissionDenied,

    #[error("No camera available")]
    NoDevice,

    #[error("Camera unavailable: {0}")]
    Unavailable(String),
}

impl CameraError {
    pub fn user_message(&self) -> &'static str {
        "Não foi possível acessar a câmera. Verifique as permissões do navegador/dispositivo."
    }
}

/// Failure to take a photo from an open stream.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The video stream has not produced a frame yet.
    #[error("Video stream not ready")]
    NotReady,

    /// The capture view was already closed.
    #[error("Capture view is closed")]
    Closed,

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl CaptureError {
    pub fn user_message(&self) -> &'static str {
        match self {
            CaptureError::Decode(e) => e.user_message(),
            _ => {
                "Não foi possível capturar a imagem. Aguarde a câmera carregar e tente novamente."
            }
        }
    }
}

/// Which camera to prefer.
///
/// Serialized with the browser's `facingMode` names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Front camera.
    #[default]
    User,
    /// Rear camera.
    Environment,
}

/// Constraints passed to the camera backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConstraints {
    pub facing: FacingMode,
    /// When false the facing mode is a preference, not a requirement.
    pub facing_required: bool,
    /// Preview is mirrored like a front camera; captures are mirrored to match.
    pub mirrored: bool,
    /// Preferred screenshot width; the backend picks the closest it supports.
    pub screenshot_width: u32,
}

impl Default for CameraConstraints {
    fn default() -> Self {
        Self {
            facing: FacingMode::User,
            facing_required: false,
            mirrored: true,
            screenshot_width: 1920,
        }
    }
}

impl CameraConstraints {
    /// The `getUserMedia` constraints object for these settings.
    pub fn media_constraints(&self) -> MediaConstraints {
        let facing_mode = if self.facing_required {
            FacingConstraint::Exact { exact: self.facing }
        } else {
            FacingConstraint::Preferred(self.facing)
        };
        MediaConstraints {
            audio: false,
            video: VideoConstraints {
                facing_mode,
                width: IdealValue {
                    ideal: self.screenshot_width,
                },
            },
        }
    }
}

/// Serializable `MediaStreamConstraints`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaConstraints {
    pub audio: bool,
    pub video: VideoConstraints,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoConstraints {
    pub facing_mode: FacingConstraint,
    pub width: IdealValue,
}

/// A bare value is a preference; `{ exact }` fails when unsatisfiable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FacingConstraint {
    Preferred(FacingMode),
    Exact { exact: FacingMode },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IdealValue {
    pub ideal: u32,
}

/// Platform camera access.
pub trait CameraBackend {
    type Stream: VideoStream;

    fn open(&mut self, constraints: &CameraConstraints) -> Result<Self::Stream, CameraError>;
}

/// A live video stream.
pub trait VideoStream {
    /// Encoded still of the current frame, or `None` while the stream is
    /// still starting up.
    fn grab_frame(&mut self) -> Option<Vec<u8>>;

    /// Stop the stream and free the device.
    fn release(&mut self);
}

/// An open capture view owning a camera stream.
pub struct CaptureView<S: VideoStream> {
    stream: Option<S>,
    mirrored: bool,
}

impl<S: VideoStream> CaptureView<S> {
    /// Acquire the camera and open the view.
    pub fn open<B>(backend: &mut B, constraints: &CameraConstraints) -> Result<Self, CameraError>
    where
        B: CameraBackend<Stream = S>,
    {
        match backend.open(constraints) {
            Ok(stream) => {
                info!("camera stream acquired");
                Ok(Self {
                    stream: Some(stream),
                    mirrored: constraints.mirrored,
                })
            }
            Err(e) => {
                warn!("camera acquisition failed: {}", e);
                Err(e)
            }
        }
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Take a photo.
    ///
    /// If the stream has no frame yet the view stays open so the user can
    /// retry. Once a frame is grabbed the stream is released, then the
    /// frame is decoded, mirrored if configured, and orientation-corrected.
    pub fn capture(&mut self, device: DeviceOrientation) -> Result<DecodedImage, CaptureError> {
        let stream = self.stream.as_mut().ok_or(CaptureError::Closed)?;

        let Some(bytes) = stream.grab_frame() else {
            warn!("capture requested before the video stream was ready");
            return Err(CaptureError::NotReady);
        };
        self.release();

        let mut image = decode_image_no_orientation(&bytes)?;
        if self.mirrored {
            image = mirror_horizontal(&image);
        }
        Ok(correct_orientation(&image, device))
    }

    /// Close the view, releasing the stream.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.release();
            debug!("camera stream released");
        }
    }
}

impl<S: VideoStream> Drop for CaptureView<S> {
    fn drop(&mut self) {
        self.release();
    }
}
