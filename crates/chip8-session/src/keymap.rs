use crate::error::{Result, SessionError};

/// Number of logical keypad keys (0x0-0xF).
pub const KEYPAD_KEYS: usize = 16;

/// Fixed mapping from the 16 logical keypad keys to host input identifiers.
///
/// The index IS the logical key: entry 0 is key `0x0`, entry 15 is key `0xF`.
/// Identifiers need not be unique; reverse lookup returns the first matching
/// index so duplicated identifiers behave deterministically. Immutable after
/// construction.
#[derive(Debug, Clone)]
pub struct Keymap {
    identifiers: Vec<String>,
}

impl Keymap {
    /// Build a keymap from exactly [`KEYPAD_KEYS`] host identifiers, in
    /// logical-key order.
    pub fn new<I, S>(identifiers: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let identifiers: Vec<String> = identifiers.into_iter().map(Into::into).collect();
        if identifiers.len() != KEYPAD_KEYS {
            return Err(SessionError::InvalidConfig(
                "keymap requires exactly 16 host identifiers",
            ));
        }
        Ok(Self { identifiers })
    }

    /// Reverse lookup: host identifier to logical key. Linear scan over the
    /// 16 entries; first match wins.
    pub fn resolve(&self, identifier: &str) -> Option<usize> {
        self.identifiers.iter().position(|id| id == identifier)
    }

    /// Forward lookup: logical key to host identifier.
    pub fn identifier(&self, key: usize) -> Option<&str> {
        self.identifiers.get(key).map(String::as_str)
    }
}
