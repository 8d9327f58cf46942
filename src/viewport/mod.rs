//! Viewport intersection capability
//!
//! Lazy loading defers a fetch until an element is near the visible
//! viewport. The intersection primitive itself belongs to the host UI; the
//! loader only consumes it through the [`ViewportObserver`] trait, so the
//! batching core stays testable without a real viewport.

pub mod manual;

/// Viewport intersection observer
///
/// Implementations typically pre-trigger a little before the element
/// actually enters the viewport (a root margin of ~100px) so the image is
/// in flight by the time the element scrolls in.
///
/// The callback contract is at-most-once per `observe` call: once fired or
/// unobserved, the callback is dropped. Loaders additionally guard their
/// own lazy queue, so a stray late callback is harmless.
pub trait ViewportObserver: Send + Sync {
    /// Watch an element; `on_visible` fires when it nears the viewport
    fn observe(&self, slot_id: u64, on_visible: Box<dyn FnOnce() + Send>);

    /// Stop watching an element, dropping any unfired callback
    fn unobserve(&self, slot_id: u64);

    /// Tear down the observer; all callbacks are dropped and later
    /// `observe` calls are ignored
    fn disconnect(&self);
}

// Re-export implementations
pub use manual::ManualViewport;
