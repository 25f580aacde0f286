//! Startup probe of the backend health endpoint.
//!
//! The result is only logged. The editor works the same whether or not
//! the backend answers.

use log::{error, info};
use moldura_core::config::EditorConfig;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::Response;

/// Health endpoint for `base_url`, or for the default backend when `None`.
#[wasm_bindgen]
pub fn health_url(base_url: Option<String>) -> String {
    let mut config = EditorConfig::default();
    if let Some(base) = base_url.filter(|b| !b.trim().is_empty()) {
        config.api_base_url = base;
    }
    config.health_url()
}

/// Fire-and-forget GET of the health endpoint.
#[wasm_bindgen]
pub fn probe_health(base_url: Option<String>) {
    let url = health_url(base_url);
    spawn_local(async move {
        match fetch_health(&url).await {
            Ok(body) => info!("backend OK ({}): {}", url, body),
            Err(e) => error!("backend health check failed ({}): {:?}", url, e),
        }
    });
}

async fn fetch_health(url: &str) -> Result<String, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let response: Response = JsFuture::from(window.fetch_with_str(url))
        .await?
        .dyn_into()?;

    if !response.ok() {
        return Err(JsValue::from_str(&format!("HTTP {}", response.status())));
    }

    let body = JsFuture::from(response.text()?).await?;
    Ok(body.as_string().unwrap_or_default())
}
