#![cfg(target_arch = "wasm32")]

use chip8_wasm::bridge_abi_version;
use wasm_bindgen_test::wasm_bindgen_test;

#[wasm_bindgen_test]
fn module_loads_and_exports_work() {
    assert_eq!(bridge_abi_version(), 1);
}
