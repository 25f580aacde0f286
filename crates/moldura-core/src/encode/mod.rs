//! Image encoding for the framing editor.
//!
//! The editor produces PNG only: the downloadable composite and the
//! orientation-corrected camera capture are both lossless re-encodes.

mod png;

pub use png::{encode_png, EncodeError};
