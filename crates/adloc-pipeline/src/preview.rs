//! Local media previews for unconfirmed uploads.
//!
//! A preview handle is owned by exactly one placeholder and released when
//! that placeholder is dropped, which happens once: on promotion or removal.

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use adloc_client::MediaFile;
use tracing::debug;

/// Creates and frees locally playable references to in-memory media.
pub trait PreviewFactory: Send + Sync {
    fn create(&self, file: &MediaFile) -> String;
    fn release(&self, handle: &str);
}

/// Owned preview reference. Releases itself on drop.
pub struct PreviewHandle {
    url: String,
    factory: Arc<dyn PreviewFactory>,
}

impl PreviewHandle {
    pub fn create(factory: Arc<dyn PreviewFactory>, file: &MediaFile) -> Self {
        let url = factory.create(file);
        Self { url, factory }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewHandle").field("url", &self.url).finish()
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        debug!(preview = %self.url, "Releasing upload preview");
        self.factory.release(&self.url);
    }
}

/// In-process preview registry issuing `blob:local/<n>` references.
#[derive(Debug, Default)]
pub struct LocalPreviews {
    next: AtomicU64,
    live: Mutex<HashSet<String>>,
    released: AtomicU64,
}

impl LocalPreviews {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles created and not yet released.
    pub fn live_count(&self) -> usize {
        self.live.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_live(&self, handle: &str) -> bool {
        self.live
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(handle)
    }

    /// Total release calls, including any for unknown handles.
    pub fn released_count(&self) -> u64 {
        self.released.load(Ordering::SeqCst)
    }
}

impl PreviewFactory for LocalPreviews {
    fn create(&self, file: &MediaFile) -> String {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        let url = format!("blob:local/{}", n);
        debug!(preview = %url, file = %file.file_name, bytes = file.len(), "Created upload preview");
        self.live
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(url.clone());
        url
    }

    fn release(&self, handle: &str) {
        self.released.fetch_add(1, Ordering::SeqCst);
        self.live
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(handle);
    }
}
