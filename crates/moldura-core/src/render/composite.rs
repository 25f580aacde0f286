//! Two-layer composite: the user's photo under the decorative frame.
//!
//! Paint order is fixed. The user layer is painted first and the frame is
//! stretched over the whole viewport last, so the frame is never occluded
//! whatever the photo's placement.

use log::trace;

use super::{Affine, RenderSurface};
use crate::config::Viewport;
use crate::decode::DecodedImage;
use crate::transform::{Layer, Placement};

/// The user layer as handed to the compositor.
#[derive(Debug, Clone, Copy)]
pub struct UserLayer<'a> {
    pub image: &'a DecodedImage,
    pub placement: Placement,
}

/// Transform that stretches the frame over `(0, 0, W, H)`.
pub fn frame_transform(frame: &DecodedImage, viewport: Viewport) -> Affine {
    if frame.width == 0 || frame.height == 0 {
        return Affine::scale(0.0, 0.0);
    }
    Affine::scale(
        viewport.width / frame.width as f64,
        viewport.height / frame.height as f64,
    )
}

/// Paint the composite onto `surface`.
///
/// Returns the layers in the order they were painted.
pub fn paint_composite<S: RenderSurface + ?Sized>(
    surface: &mut S,
    user: Option<UserLayer<'_>>,
    frame: &DecodedImage,
    viewport: Viewport,
) -> Vec<Layer> {
    let mut painted = Vec::with_capacity(2);

    if let Some(layer) = user {
        surface.draw_image(layer.image, &Affine::from_placement(&layer.placement));
        painted.push(Layer::User);
    }

    surface.draw_image(frame, &frame_transform(frame, viewport));
    painted.push(Layer::Frame);

    trace!("painted layers {:?}", painted);
    painted
}
