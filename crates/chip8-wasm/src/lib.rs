//! Browser bindings for the CHIP-8/XO-CHIP host-integration layer.
//!
//! This crate is the wasm-bindgen face of `chip8-session`: the page script
//! constructs a [`session_bridge::SessionBridge`] around the interpreter
//! core object, wires DOM key events into `key_down`/`key_up`, awaits the
//! canvas with [`canvas::await_canvas`] before handing it focus, and
//! resolves ROM selections through [`rom_fetch::RomStore`].
//!
//! Everything DOM-facing is `wasm32`-only; the inner model crate carries the
//! semantics and the native tests.

use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
pub mod canvas;
#[cfg(target_arch = "wasm32")]
pub mod rom_fetch;
#[cfg(target_arch = "wasm32")]
pub mod session_bridge;

/// Cheap ABI sanity check for the page script. Bump when the exported
/// surface changes incompatibly.
#[wasm_bindgen]
pub fn bridge_abi_version() -> u32 {
    1
}
