//! Browser-side delivery: file download and user alerts.

use log::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

const PNG_MIME: &str = "image/png";

/// Offer `bytes` to the user as a PNG download named `file_name`.
///
/// A temporary object URL is created for the blob and revoked once the
/// hidden anchor has been clicked.
#[wasm_bindgen]
pub fn offer_download(bytes: &[u8], file_name: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("no document body"))?;

    let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
    let options = BlobPropertyBag::new();
    options.set_type(PNG_MIME);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let clicked = (|| -> Result<(), JsValue> {
        let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
        anchor.set_href(&url);
        anchor.set_download(file_name);
        anchor.set_attribute("style", "display:none;")?;
        body.append_child(&anchor)?;
        anchor.click();
        anchor.remove();
        Ok(())
    })();

    Url::revoke_object_url(&url)?;
    clicked?;
    debug!("download offered: {} ({} bytes)", file_name, bytes.len());
    Ok(())
}

/// Show a blocking alert.
#[wasm_bindgen]
pub fn notify_user(message: &str) {
    if let Some(window) = web_sys::window() {
        // Nothing else to fall back to if the alert itself fails
        let _ = window.alert_with_message(message);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_offer_download_leaves_no_anchor() {
        offer_download(&[137, 80, 78, 71], "test.png").unwrap();
        let document = web_sys::window().unwrap().document().unwrap();
        assert!(document.query_selector("a[download]").unwrap().is_none());
    }
}
