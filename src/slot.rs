//! Bindable image targets
//!
//! A slot is the loader-facing face of a UI image element: something whose
//! displayed source can be swapped and which remembers whether a real image
//! has ever landed in it.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Counter for generating unique slot ids
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// A bindable image target
///
/// Implementations wrap whatever the UI toolkit uses for an image element.
/// The loader keys lazy-queue entries on [`slot_id`](ImageSlot::slot_id), so
/// ids must be unique per element for the lifetime of the process.
pub trait ImageSlot: Send + Sync {
    /// Unique identity of the underlying element
    fn slot_id(&self) -> u64;

    /// Swap the displayed image source
    fn set_source(&self, url: &str);

    /// The currently displayed source
    fn current_source(&self) -> String;

    /// Record that a real (non-placeholder) image has been applied
    ///
    /// Once set, later queue calls skip the placeholder reset so an already
    /// resolved element never flashes back to the placeholder.
    fn mark_loaded(&self);

    /// Whether a real image has been applied
    fn is_loaded(&self) -> bool;
}

/// In-memory slot implementation
///
/// The reference implementation used by tests, demos and headless callers.
/// UI toolkits with their own element type implement [`ImageSlot`] directly.
#[derive(Debug)]
pub struct ImageCell {
    id: u64,
    source: RwLock<String>,
    loaded: AtomicBool,
}

impl Default for ImageCell {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageCell {
    /// Create an empty cell
    pub fn new() -> Self {
        Self {
            id: next_id(),
            source: RwLock::new(String::new()),
            loaded: AtomicBool::new(false),
        }
    }

    /// Create an empty cell behind an `Arc`, ready to hand to a loader
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl ImageSlot for ImageCell {
    fn slot_id(&self) -> u64 {
        self.id
    }

    fn set_source(&self, url: &str) {
        *self.source.write() = url.to_string();
    }

    fn current_source(&self) -> String {
        self.source.read().clone()
    }

    fn mark_loaded(&self) {
        self.loaded.store(true, Ordering::SeqCst);
    }

    fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }
}
