use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Tracks counters for batching and resolution behavior
#[derive(Debug, Default)]
pub struct LoaderMetrics {
    batches_fired: AtomicU64,
    coalesced_requests: AtomicU64,
    resolved_slots: AtomicU64,
    unresolved_requests: AtomicU64,
    failed_chunks: AtomicU64,
    capability_misses: AtomicU64,
}

impl LoaderMetrics {
    /// Create a new instance of LoaderMetrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a category drain that issued at least one chunk
    pub fn record_batch(&self) {
        self.batches_fired.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a queue call that merged into an existing pending request
    pub fn record_coalesced(&self) {
        self.coalesced_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Record elements updated with a resolved URL
    pub fn record_resolved(&self, slots: usize) {
        self.resolved_slots.fetch_add(slots as u64, Ordering::Relaxed);
    }

    /// Record a request the host response omitted or left uncompleted
    pub fn record_unresolved(&self) {
        self.unresolved_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a chunk whose host call failed
    pub fn record_failed_chunk(&self) {
        self.failed_chunks.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a drain skipped because the host lacks the endpoint
    pub fn record_capability_miss(&self) {
        self.capability_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of category drains that issued chunks
    pub fn batches_fired(&self) -> u64 {
        self.batches_fired.load(Ordering::Relaxed)
    }

    /// Number of queue calls absorbed by coalescing
    pub fn coalesced_requests(&self) -> u64 {
        self.coalesced_requests.load(Ordering::Relaxed)
    }

    /// Number of elements that received a resolved URL
    pub fn resolved_slots(&self) -> u64 {
        self.resolved_slots.load(Ordering::Relaxed)
    }

    /// Number of requests left on their placeholder after a drain
    pub fn unresolved_requests(&self) -> u64 {
        self.unresolved_requests.load(Ordering::Relaxed)
    }

    /// Number of chunks whose host call failed
    pub fn failed_chunks(&self) -> u64 {
        self.failed_chunks.load(Ordering::Relaxed)
    }

    /// Number of drains skipped for a missing host endpoint
    pub fn capability_misses(&self) -> u64 {
        self.capability_misses.load(Ordering::Relaxed)
    }
}

/// A thread-safe wrapper around LoaderMetrics
#[derive(Debug, Clone, Default)]
pub struct LoaderMetricsHandle(Arc<LoaderMetrics>);

impl LoaderMetricsHandle {
    /// Create a new metrics handle
    pub fn new() -> Self {
        Self(Arc::new(LoaderMetrics::new()))
    }

    /// Get a reference to the underlying metrics
    pub fn inner(&self) -> &LoaderMetrics {
        &self.0
    }
}

impl std::ops::Deref for LoaderMetricsHandle {
    type Target = LoaderMetrics;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
