//! Host key events in, core key edges out.
//!
//! Every host gesture source (mouse, touch, keyboard) funnels through the
//! same [`InputBridge::host_press`] / [`InputBridge::host_release`] pair, so
//! simultaneous sources on the same key cannot double-press: the "currently
//! pressed" mark is keyed by logical key, not by input source.

use crate::keymap::{Keymap, KEYPAD_KEYS};

/// Receives key edges destined for the interpreter core.
pub trait KeyEdgeSink {
    fn set_key_state(&mut self, key: usize, pressed: bool);
}

/// Receives key-state changes for host-side visual feedback (e.g. restyling
/// the on-screen keypad element for `key`).
pub trait KeyFeedbackSink {
    fn key_pressed(&mut self, key: usize);
    fn key_released(&mut self, key: usize);
}

/// Converts host press/release events into key-state edges on the core.
///
/// Handling is synchronous and totally ordered with host event delivery;
/// there is no internal queueing or batching. The bridge stays wired for the
/// whole session, independent of start/reset.
pub struct InputBridge {
    keymap: Keymap,
    /// Keys the host currently holds down, by logical key.
    pressed: [bool; KEYPAD_KEYS],
    /// Last key state reported outward, used to dedup visual updates.
    reported: [bool; KEYPAD_KEYS],
    core: Box<dyn KeyEdgeSink>,
    feedback: Option<Box<dyn KeyFeedbackSink>>,
}

impl InputBridge {
    pub fn new(keymap: Keymap, core: Box<dyn KeyEdgeSink>) -> Self {
        Self {
            keymap,
            pressed: [false; KEYPAD_KEYS],
            reported: [false; KEYPAD_KEYS],
            core,
            feedback: None,
        }
    }

    /// Register the outward visual-feedback channel.
    pub fn set_feedback_sink(&mut self, sink: Box<dyn KeyFeedbackSink>) {
        self.feedback = Some(sink);
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn is_pressed(&self, key: usize) -> bool {
        self.pressed.get(key).copied().unwrap_or(false)
    }

    /// Host reported a press-like gesture for `identifier`.
    ///
    /// Unknown identifiers are dropped silently. A key that is already down
    /// is a no-op: host platforms fire repeated "down" events during
    /// key-repeat, and those must not become repeated press edges.
    pub fn host_press(&mut self, identifier: &str) {
        let Some(key) = self.keymap.resolve(identifier) else {
            return;
        };
        if self.pressed[key] {
            return;
        }
        self.pressed[key] = true;
        self.core.set_key_state(key, true);
    }

    /// Host reported a release-like gesture for `identifier`.
    ///
    /// Safe to call for keys that were never pressed: `mouseleave` and
    /// `touchcancel` race `mouseup` on real pages, so redundant releases are
    /// expected and ignored.
    pub fn host_release(&mut self, identifier: &str) {
        let Some(key) = self.keymap.resolve(identifier) else {
            return;
        };
        if !self.pressed[key] {
            return;
        }
        self.pressed[key] = false;
        self.core.set_key_state(key, false);
    }

    /// Release every key the host still holds down. Used when the core is
    /// reset mid-press so no key stays stuck.
    pub fn release_all(&mut self) {
        for key in 0..KEYPAD_KEYS {
            if self.pressed[key] {
                self.pressed[key] = false;
                self.core.set_key_state(key, false);
            }
        }
    }

    /// The core reported its own key-state change (e.g. a programmatic
    /// release on reset). Forwarded outward at most once per actual change.
    pub fn core_key_changed(&mut self, key: usize, pressed: bool) {
        if key >= KEYPAD_KEYS || self.reported[key] == pressed {
            return;
        }
        self.reported[key] = pressed;
        if let Some(feedback) = self.feedback.as_mut() {
            if pressed {
                feedback.key_pressed(key);
            } else {
                feedback.key_released(key);
            }
        }
    }
}
