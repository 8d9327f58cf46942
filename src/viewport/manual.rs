//! Manually driven viewport observer
//!
//! Provides an observer whose intersections are triggered by the caller,
//! for tests and headless drivers without a real viewport.

use super::ViewportObserver;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

type Callback = Box<dyn FnOnce() + Send>;

/// Manually driven viewport observer
///
/// Stores callbacks and fires them on [`trigger`](ManualViewport::trigger).
/// Clones share state, so a test can keep a handle after moving one into a
/// loader.
#[derive(Clone, Default)]
pub struct ManualViewport {
    callbacks: Arc<Mutex<HashMap<u64, Callback>>>,
    disconnected: Arc<AtomicBool>,
}

impl ManualViewport {
    /// Create a new manual observer
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the element nearing the viewport
    ///
    /// Fires and consumes the element's callback. Returns false when the
    /// element is not being observed (never observed, already triggered,
    /// or unobserved).
    pub fn trigger(&self, slot_id: u64) -> bool {
        let callback = self.callbacks.lock().remove(&slot_id);
        match callback {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    /// Trigger every observed element, in no particular order
    pub fn trigger_all(&self) -> usize {
        let drained: Vec<Callback> = {
            let mut callbacks = self.callbacks.lock();
            callbacks.drain().map(|(_, callback)| callback).collect()
        };
        let count = drained.len();
        for callback in drained {
            callback();
        }
        count
    }

    /// Number of elements currently observed
    pub fn observed_count(&self) -> usize {
        self.callbacks.lock().len()
    }

    /// Whether a specific element is observed
    pub fn is_observing(&self, slot_id: u64) -> bool {
        self.callbacks.lock().contains_key(&slot_id)
    }
}

impl ViewportObserver for ManualViewport {
    fn observe(&self, slot_id: u64, on_visible: Box<dyn FnOnce() + Send>) {
        if self.disconnected.load(Ordering::SeqCst) {
            return;
        }
        // Re-observing replaces the previous callback
        self.callbacks.lock().insert(slot_id, on_visible);
    }

    fn unobserve(&self, slot_id: u64) {
        self.callbacks.lock().remove(&slot_id);
    }

    fn disconnect(&self) {
        self.disconnected.store(true, Ordering::SeqCst);
        self.callbacks.lock().clear();
    }
}
