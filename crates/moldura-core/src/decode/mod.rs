//! Image decoding for the framing editor.
//!
//! This module provides functionality for:
//! - Decoding picked photos of any standard raster format
//! - Applying EXIF orientation so photos are upright before fitting
//! - Decoding the bundled frame asset (transparency preserved)
//!
//! All images are decoded to straight-alpha RGBA8.
//!
//! # Examples
//!
//! ```ignore
//! use moldura_core::decode::decode_image;
//!
//! let bytes = std::fs::read("selfie.jpg").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod raster;
mod types;

pub use raster::{decode_image, decode_image_no_orientation};
pub use types::{DecodeError, DecodedImage, Orientation};
