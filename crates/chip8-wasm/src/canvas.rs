//! Canvas rendezvous: wait for the host page to create the rendering canvas.
//!
//! The display module inserts its `<canvas>` at an unpredictable point
//! relative to page setup, and the host must not hand it focus before it
//! exists. The watch is scoped to the emulator's root element, not the whole
//! document, and the `MutationObserver` is disconnected the moment the
//! rendezvous resolves (or is cancelled).
#![cfg(target_arch = "wasm32")]
#![forbid(unsafe_code)]

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use chip8_session::{await_surface, StructureWatch};

fn js_error(message: impl core::fmt::Display) -> JsValue {
    js_sys::Error::new(&message.to_string()).into()
}

/// Active `MutationObserver` subscription; disconnects on drop.
pub struct DomWatchGuard {
    observer: web_sys::MutationObserver,
    // Keeps the JS-side callback alive while the observer is connected.
    _callback: Closure<dyn FnMut(js_sys::Array, web_sys::MutationObserver)>,
}

impl Drop for DomWatchGuard {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Structural watch over one DOM subtree.
pub struct DomStructureWatch {
    root: web_sys::Element,
}

impl DomStructureWatch {
    pub fn new(root: web_sys::Element) -> Self {
        Self { root }
    }
}

impl StructureWatch for DomStructureWatch {
    type Guard = DomWatchGuard;

    fn subscribe(&self, mut notify: Box<dyn FnMut()>) -> DomWatchGuard {
        let callback = Closure::new(
            move |_records: js_sys::Array, _observer: web_sys::MutationObserver| {
                notify();
            },
        );
        let observer = web_sys::MutationObserver::new(callback.as_ref().unchecked_ref())
            .expect("MutationObserver is available in every supported host");
        let init = web_sys::MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        observer
            .observe_with_options(&self.root, &init)
            .expect("child_list observation of an element cannot be rejected");
        DomWatchGuard {
            observer,
            _callback: callback,
        }
    }
}

/// Resolve once a `<canvas>` exists under `root`.
///
/// The current DOM is probed before any watch is taken, so a canvas created
/// synchronously before this call resolves immediately instead of waiting
/// for a mutation that will never come.
#[wasm_bindgen]
pub async fn await_canvas(root: web_sys::Element) -> Result<web_sys::HtmlCanvasElement, JsValue> {
    let watch = DomStructureWatch::new(root.clone());
    let probe = move || {
        root.query_selector("canvas")
            .ok()
            .flatten()
            .and_then(|element| element.dyn_into::<web_sys::HtmlCanvasElement>().ok())
    };
    await_surface(&watch, probe).await.map_err(js_error)
}
