use thiserror::Error;

pub type Result<T> = std::result::Result<T, SessionError>;

/// Unified error type for the host/core bridge.
///
/// Everything here is reported to the host caller and is recoverable: a
/// rejected configure or reset leaves the previous session state fully
/// intact, and none of these variants should tear down the page. Unmapped
/// host key identifiers are deliberately NOT represented — they are an
/// expected condition and are dropped silently by the input bridge.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Configuration rejected before anything reached the core (bad clock,
    /// empty ROM, malformed keymap, unknown target or sync-mode code).
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// Operation not legal in the session's current lifecycle state.
    #[error("{op} not permitted while {state}")]
    InvalidState {
        op: &'static str,
        state: &'static str,
    },

    /// ROM selection could not be resolved to bytes (unknown selection or
    /// failed fetch).
    #[error("ROM unavailable: {0}")]
    RomUnavailable(String),

    /// The structural watch ended without ever producing a rendering
    /// surface.
    #[error("rendering surface never appeared")]
    SurfaceLost,
}
