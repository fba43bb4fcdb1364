//! ROM selection resolution.
//!
//! A selection is a single string: the name of a ROM the user uploaded
//! earlier, or a built-in path handed to the fetcher. Uploads shadow
//! built-ins of the same name. Nothing fetched is ever cached — reset
//! re-resolves the current selection so stale bytes cannot survive a
//! reconfiguration.

use std::collections::HashMap;

use tracing::warn;

use crate::error::{Result, SessionError};

/// Retrieves ROM bytes for a built-in path (network on the web, in-memory
/// fixtures in tests).
pub trait RomFetcher {
    #[allow(async_fn_in_trait)]
    async fn fetch(&self, path: &str) -> Result<Vec<u8>>;
}

/// Resolves ROM selections against user uploads first, then the fetcher.
pub struct RomSource<F> {
    fetcher: F,
    uploads: HashMap<String, Vec<u8>>,
}

impl<F: RomFetcher> RomSource<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            uploads: HashMap::new(),
        }
    }

    /// Capture user-picked ROM bytes under `name`. Re-uploading replaces the
    /// previous bytes.
    pub fn add_upload(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.uploads.insert(name.into(), bytes);
    }

    /// Resolve `selection` to ROM bytes, re-reading the current selection on
    /// every call.
    pub async fn resolve(&self, selection: &str) -> Result<Vec<u8>> {
        if let Some(bytes) = self.uploads.get(selection) {
            return Ok(bytes.clone());
        }
        match self.fetcher.fetch(selection).await {
            Ok(bytes) => Ok(bytes),
            Err(err) => {
                warn!(selection, %err, "ROM resolution failed");
                Err(SessionError::RomUnavailable(format!("{selection}: {err}")))
            }
        }
    }
}
