//! ROM retrieval over `fetch()`, plus the uploaded-ROM library.
#![cfg(target_arch = "wasm32")]
#![forbid(unsafe_code)]

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use chip8_session::{Result as SessionResult, RomFetcher, RomSource, SessionError};

fn js_error(message: impl core::fmt::Display) -> JsValue {
    js_sys::Error::new(&message.to_string()).into()
}

fn unavailable(message: impl Into<String>) -> SessionError {
    SessionError::RomUnavailable(message.into())
}

/// Fetches built-in ROM paths relative to the page via `window.fetch`.
pub struct FetchRomFetcher;

impl RomFetcher for FetchRomFetcher {
    async fn fetch(&self, path: &str) -> SessionResult<Vec<u8>> {
        let window = web_sys::window().ok_or_else(|| unavailable("no window object"))?;
        let response = JsFuture::from(window.fetch_with_str(path))
            .await
            .map_err(|_| unavailable(format!("fetch failed for {path}")))?;
        let response: web_sys::Response = response
            .dyn_into()
            .map_err(|_| unavailable("fetch produced a non-Response value"))?;
        if !response.ok() {
            return Err(unavailable(format!(
                "HTTP {} for {path}",
                response.status()
            )));
        }
        let buffer = JsFuture::from(
            response
                .array_buffer()
                .map_err(|_| unavailable("response body is not readable"))?,
        )
        .await
        .map_err(|_| unavailable(format!("body read failed for {path}")))?;
        Ok(js_sys::Uint8Array::new(&buffer).to_vec())
    }
}

/// WASM export: resolves ROM selections for the page script.
///
/// A selection is the value of the ROM dropdown: the name of a previously
/// uploaded file, or a built-in path to fetch. Uploads shadow built-ins;
/// nothing fetched is ever cached, so a reset always re-reads the current
/// selection.
#[wasm_bindgen]
pub struct RomStore {
    inner: RomSource<FetchRomFetcher>,
}

impl Default for RomStore {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl RomStore {
    #[wasm_bindgen(constructor)]
    pub fn new() -> RomStore {
        Self {
            inner: RomSource::new(FetchRomFetcher),
        }
    }

    /// Capture an uploaded ROM's bytes under `name`. Re-uploading replaces
    /// the previous bytes.
    pub fn add_upload(&mut self, name: String, bytes: Vec<u8>) {
        self.inner.add_upload(name, bytes);
    }

    /// Resolve the current selection to ROM bytes.
    pub async fn resolve(&self, selection: String) -> Result<Vec<u8>, JsValue> {
        self.inner.resolve(&selection).await.map_err(js_error)
    }
}
