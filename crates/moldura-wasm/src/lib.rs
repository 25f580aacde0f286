//! Moldura WASM - WebAssembly bindings for Moldura
//!
//! This crate exposes the moldura-core framing engine to the browser page.
//!
//! # Module Structure
//!
//! - `editor` - The editing session (load, zoom, drag, transform, export)
//! - `capture` - Camera still orientation correction
//! - `download` - PNG download and user alerts
//! - `health` - Backend health probe
//! - `logger` - `log` output to the browser console
//! - `types` - WASM-compatible wrapper types
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsEditor, probe_health } from '@moldura/wasm';
//!
//! await init();
//! probe_health(import.meta.env.VITE_API_URL);
//!
//! const frame = new Uint8Array(await (await fetch('/moldura.png')).arrayBuffer());
//! const editor = new JsEditor(frame, undefined);
//! ```

use log::LevelFilter;
use wasm_bindgen::prelude::*;

mod capture;
mod download;
mod editor;
mod health;
mod logger;
mod types;

pub use capture::{correct_capture_orientation, device_orientation, JsCorrectedCapture};
pub use download::{notify_user, offer_download};
pub use editor::{JsEditor, JsLoadToken};
pub use health::{health_url, probe_health};
pub use logger::set_log_level;
pub use types::{JsDecodedImage, JsPlacement};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    logger::install(LevelFilter::Info);
    log::debug!("moldura-wasm {} ready", version());
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
