//! Compositing of the user photo and the frame.
//!
//! The compositor only talks to the [`RenderSurface`] trait; the browser
//! page may paint with its own canvas, while export goes through the CPU
//! [`RasterSurface`].

mod affine;
mod composite;
mod surface;

pub use affine::Affine;
pub use composite::{frame_transform, paint_composite, UserLayer};
pub use surface::{RasterSurface, RenderSurface};
