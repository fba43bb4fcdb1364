//! Host-integration layer for an embedded CHIP-8/XO-CHIP interpreter core.
//!
//! The interpreter itself (opcode execution, display planes, timers) is an
//! external collaborator consumed through the [`session::Core`] trait; this
//! crate owns the small but order-sensitive protocol around it:
//!
//! - [`keymap::Keymap`]: the fixed 16-slot logical keypad to host-identifier
//!   table.
//! - [`input::InputBridge`]: host press/release events in, key edges out,
//!   with key-repeat suppression and an outward visual-feedback channel.
//! - [`rendezvous`]: a one-shot async wait for the rendering surface to
//!   appear, with a cancellable structural watch.
//! - [`session::SessionController`]: the `Unconfigured -> Armed -> Running`
//!   lifecycle with exactly-once start semantics.
//! - [`rom`]: ROM selection resolution (user uploads shadowing fetched
//!   built-ins).
//!
//! Nothing in this crate touches the DOM or wasm; the browser binding lives
//! in `chip8-wasm`.

pub mod error;
pub mod input;
pub mod keymap;
pub mod rendezvous;
pub mod rom;
pub mod session;

pub use error::{Result, SessionError};
pub use input::{InputBridge, KeyEdgeSink, KeyFeedbackSink};
pub use keymap::{Keymap, KEYPAD_KEYS};
pub use rendezvous::{await_surface, StructureWatch};
pub use rom::{RomFetcher, RomSource};
pub use session::{Core, SessionConfig, SessionController, SessionState, SyncMode, Target};
