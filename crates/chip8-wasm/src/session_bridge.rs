//! WASM-side bridge exposing the session lifecycle and keypad input to JS.
//!
//! The page script constructs one [`SessionBridge`] per emulator instance,
//! passing the interpreter core object and the 16 host key identifiers in
//! logical-key order. DOM gesture handlers (mousedown/touchstart and
//! mouseup/mouseleave/touchend/touchcancel) all funnel into
//! [`SessionBridge::key_down`] / [`SessionBridge::key_up`]; the lifecycle
//! buttons call `configure`/`reset`/`enter`/`start`.
//!
//! Key-feedback callbacks are registered explicitly on the bridge instance
//! rather than through any global mutable import table, so each session owns
//! its callbacks for its whole lifetime.
#![cfg(target_arch = "wasm32")]
#![forbid(unsafe_code)]

use std::rc::Rc;

use wasm_bindgen::prelude::*;

use chip8_session::{
    Core, InputBridge, KeyEdgeSink, KeyFeedbackSink, Keymap, SessionConfig, SessionController,
    SessionError, SessionState, SyncMode, Target,
};

fn js_error(message: impl core::fmt::Display) -> JsValue {
    js_sys::Error::new(&message.to_string()).into()
}

#[wasm_bindgen]
extern "C" {
    /// The external interpreter core instance, implemented by the embedding
    /// page (typically another wasm module that owns opcode execution,
    /// display planes and timers).
    pub type EmuCore;

    #[wasm_bindgen(method, js_name = applyConfig)]
    fn apply_config(this: &EmuCore, target: u32, clock_hz: u32, rom: &[u8]);

    #[wasm_bindgen(method, js_name = setSyncMode)]
    fn set_sync_mode(this: &EmuCore, mode: u32);

    #[wasm_bindgen(method, js_name = setKeyState)]
    fn set_key_state(this: &EmuCore, key: u32, pressed: bool);

    #[wasm_bindgen(method)]
    fn start(this: &EmuCore);

    #[wasm_bindgen(method)]
    fn reset(this: &EmuCore);

    #[wasm_bindgen(method, js_name = getDisplayWidth)]
    fn get_display_width(this: &EmuCore) -> u32;

    #[wasm_bindgen(method, js_name = getDisplayHeight)]
    fn get_display_height(this: &EmuCore) -> u32;
}

/// Shared handle to the JS core so the session controller and the input
/// bridge drive the same instance.
#[derive(Clone)]
struct CoreHandle {
    core: Rc<EmuCore>,
}

impl Core for CoreHandle {
    fn apply_config(&mut self, target: Target, clock_hz: u32, rom: &[u8]) {
        self.core.apply_config(target.code(), clock_hz, rom);
    }

    fn set_sync_mode(&mut self, mode: SyncMode) {
        self.core.set_sync_mode(mode.code());
    }

    fn start(&mut self) {
        self.core.start();
    }

    fn reset(&mut self) {
        self.core.reset();
    }

    fn display_width(&self) -> usize {
        self.core.get_display_width() as usize
    }

    fn display_height(&self) -> usize {
        self.core.get_display_height() as usize
    }
}

impl KeyEdgeSink for CoreHandle {
    fn set_key_state(&mut self, key: usize, pressed: bool) {
        self.core.set_key_state(key as u32, pressed);
    }
}

/// Visual key feedback routed to a pair of JS callbacks.
struct JsKeyFeedback {
    on_pressed: js_sys::Function,
    on_released: js_sys::Function,
}

impl KeyFeedbackSink for JsKeyFeedback {
    fn key_pressed(&mut self, key: usize) {
        let _ = self
            .on_pressed
            .call1(&JsValue::NULL, &JsValue::from(key as u32));
    }

    fn key_released(&mut self, key: usize) {
        let _ = self
            .on_released
            .call1(&JsValue::NULL, &JsValue::from(key as u32));
    }
}

/// WASM export: one emulator session (core + config + keypad wiring).
#[wasm_bindgen]
pub struct SessionBridge {
    session: SessionController<CoreHandle>,
    input: InputBridge,
    entered: bool,
}

#[wasm_bindgen]
impl SessionBridge {
    /// Wire a new session around `core`. `key_identifiers` are the 16 host
    /// identifiers in logical-key order (0x0-0xF); anything but exactly 16
    /// entries is rejected.
    #[wasm_bindgen(constructor)]
    pub fn new(core: EmuCore, key_identifiers: Vec<String>) -> Result<SessionBridge, JsValue> {
        let handle = CoreHandle {
            core: Rc::new(core),
        };
        let keymap = Keymap::new(key_identifiers).map_err(js_error)?;
        let input = InputBridge::new(keymap, Box::new(handle.clone()));
        Ok(Self {
            session: SessionController::new(handle),
            input,
            entered: false,
        })
    }

    /// Register the visual key-feedback callbacks. `on_pressed(key)` /
    /// `on_released(key)` fire at most once per actual key-state change
    /// reported by the core.
    pub fn register_key_callbacks(
        &mut self,
        on_pressed: js_sys::Function,
        on_released: js_sys::Function,
    ) {
        self.input.set_feedback_sink(Box::new(JsKeyFeedback {
            on_pressed,
            on_released,
        }));
    }

    /// Apply a full configuration to an idle session. Reconfiguring a
    /// running session must go through [`SessionBridge::reset`].
    pub fn configure(
        &mut self,
        target: u32,
        clock_hz: u32,
        sync_mode: u32,
        rom: Vec<u8>,
    ) -> Result<(), JsValue> {
        let config = build_config(target, clock_hz, sync_mode, rom)?;
        self.session.configure(config).map_err(js_error)
    }

    /// Start the armed session. Idempotent while running.
    pub fn start(&mut self) -> Result<(), JsValue> {
        self.session.start().map_err(js_error)
    }

    /// Tear down any run state and re-arm with a fresh configuration. On
    /// success any keys the host still holds are released so nothing stays
    /// stuck pressed across the reset.
    pub fn reset(
        &mut self,
        target: u32,
        clock_hz: u32,
        sync_mode: u32,
        rom: Vec<u8>,
    ) -> Result<(), JsValue> {
        let config = build_config(target, clock_hz, sync_mode, rom)?;
        self.session.reset(config).map_err(js_error)?;
        self.input.release_all();
        Ok(())
    }

    /// The overlay's one-time trigger: reset with the given configuration,
    /// then start. Latched so a double-click before the overlay leaves the
    /// page starts the session exactly once.
    pub fn enter(
        &mut self,
        target: u32,
        clock_hz: u32,
        sync_mode: u32,
        rom: Vec<u8>,
    ) -> Result<(), JsValue> {
        if self.entered {
            return Ok(());
        }
        self.reset(target, clock_hz, sync_mode, rom)?;
        self.start()?;
        self.entered = true;
        Ok(())
    }

    /// Host press-like gesture (mousedown, touchstart, keydown) for a key
    /// identifier. Unknown identifiers and key-repeat are dropped.
    pub fn key_down(&mut self, identifier: &str) {
        self.input.host_press(identifier);
    }

    /// Host release-like gesture (mouseup, mouseleave, touchend,
    /// touchcancel). Always safe, even for keys that were never pressed.
    pub fn key_up(&mut self, identifier: &str) {
        self.input.host_release(identifier);
    }

    /// Called by the core when its internal key state changes (e.g. a
    /// programmatic release on reset); forwards to the registered feedback
    /// callbacks, deduplicated.
    pub fn core_key_changed(&mut self, key: u32, pressed: bool) {
        self.input.core_key_changed(key as usize, pressed);
    }

    pub fn display_width(&self) -> u32 {
        self.session.core().display_width() as u32
    }

    pub fn display_height(&self) -> u32 {
        self.session.core().display_height() as u32
    }

    /// Current lifecycle state, for UI/debug display.
    pub fn state(&self) -> String {
        match self.session.state() {
            SessionState::Unconfigured => "unconfigured",
            SessionState::Armed => "armed",
            SessionState::Running => "running",
        }
        .to_string()
    }

    /// Recommended clock rate for a dialect, used by the settings UI when
    /// the target selection changes.
    pub fn recommended_clock(target: u32) -> Result<u32, JsValue> {
        Target::from_code(target)
            .map(Target::recommended_clock)
            .ok_or_else(|| js_error(SessionError::InvalidConfig("unknown target code")))
    }
}

fn build_config(
    target: u32,
    clock_hz: u32,
    sync_mode: u32,
    rom: Vec<u8>,
) -> Result<SessionConfig, JsValue> {
    let target = Target::from_code(target)
        .ok_or_else(|| js_error(SessionError::InvalidConfig("unknown target code")))?;
    let sync_mode = SyncMode::from_code(sync_mode)
        .ok_or_else(|| js_error(SessionError::InvalidConfig("unknown sync-mode code")))?;
    Ok(SessionConfig {
        target,
        clock_hz,
        sync_mode,
        rom,
    })
}
