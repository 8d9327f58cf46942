//! Thumbnail batching and lazy-load pipeline
//!
//! This module provides the loader that decouples "this element needs image
//! X" from "fetch image X now": requests coalesce per `(id, size)` pair,
//! bursts debounce into one batched host call per category, oversized
//! drains split into sequential chunks, and fetches can be deferred until
//! an element nears the viewport.

pub mod metrics;
pub(crate) mod pending;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use log::{debug, trace, warn};
use parking_lot::Mutex;

use crate::config::LoaderConfig;
use crate::fetch::{Category, FetchResult, FetcherCapabilities, ThumbnailFetcher, ThumbnailResult};
use crate::runtime::AsyncSpawner;
use crate::slot::ImageSlot;
use crate::viewport::ViewportObserver;
use metrics::LoaderMetricsHandle;
use pending::{PendingQueue, PendingRequest};

/// Snapshot of the three pending-queue sizes, for diagnostics and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PendingCounts {
    pub game_thumbnails: usize,
    pub game_icons: usize,
    pub user_avatars: usize,
}

impl PendingCounts {
    /// Total distinct pending requests across every category
    pub fn total(&self) -> usize {
        self.game_thumbnails + self.game_icons + self.user_avatars
    }
}

/// A request parked until its element nears the viewport
struct LazyRequest {
    category: Category,
    entity_id: u64,
    size: String,
    slot: Arc<dyn ImageSlot>,
}

/// Per-category queue plus its debounce generation
///
/// The generation is the coalescing primitive: every (re)schedule bumps it,
/// and a timer task only drains when the generation it captured is still
/// current. A bump therefore cancels every armed timer for the category
/// without tracking timer handles.
#[derive(Default)]
struct CategoryState {
    pending: Mutex<PendingQueue>,
    generation: AtomicU64,
}

struct LoaderShared<F, S> {
    config: LoaderConfig,
    fetcher: F,
    spawner: S,
    capabilities: FetcherCapabilities,
    viewport: Option<Arc<dyn ViewportObserver>>,
    lazy_enabled: bool,
    categories: [CategoryState; 3],
    lazy: Mutex<HashMap<u64, LazyRequest>>,
    metrics: LoaderMetricsHandle,
    destroyed: AtomicBool,
}

/// Batched, coalescing, lazily-loading thumbnail fetcher
///
/// Generic over the host adapter and the async runtime for maximum
/// flexibility; both are injected at construction.
///
/// Queue calls are fire-and-forget: the element gets its category's
/// placeholder at once and the resolved URL whenever the batch lands.
/// Nothing a host call does ever propagates back to the caller.
pub struct ThumbnailLoader<F: ThumbnailFetcher + 'static, S: AsyncSpawner + 'static> {
    shared: Arc<LoaderShared<F, S>>,
}

impl<F: ThumbnailFetcher + 'static, S: AsyncSpawner + 'static> ThumbnailLoader<F, S> {
    /// Create a loader without a viewport observer
    ///
    /// Lazy loading is disabled regardless of configuration; every queue
    /// call enqueues immediately.
    pub fn new(fetcher: F, spawner: S, config: LoaderConfig) -> Self {
        Self::build(fetcher, spawner, config, None)
    }

    /// Create a loader with viewport-driven lazy loading
    pub fn with_viewport(
        fetcher: F,
        spawner: S,
        config: LoaderConfig,
        viewport: Arc<dyn ViewportObserver>,
    ) -> Self {
        Self::build(fetcher, spawner, config, Some(viewport))
    }

    fn build(
        fetcher: F,
        spawner: S,
        mut config: LoaderConfig,
        viewport: Option<Arc<dyn ViewportObserver>>,
    ) -> Self {
        // A zero chunk size cannot drain; quietly use the minimum
        config.max_batch_size = config.max_batch_size.max(1);

        let lazy_enabled = config.lazy_loading && viewport.is_some();
        if config.lazy_loading && viewport.is_none() {
            debug!("no viewport observer available, lazy loading disabled");
        }

        let capabilities = fetcher.capabilities();
        Self {
            shared: Arc::new(LoaderShared {
                config,
                fetcher,
                spawner,
                capabilities,
                viewport,
                lazy_enabled,
                categories: Default::default(),
                lazy: Mutex::new(HashMap::new()),
                metrics: LoaderMetricsHandle::new(),
                destroyed: AtomicBool::new(false),
            }),
        }
    }

    /// Queue a wide game thumbnail for `universe_id` into `slot`
    ///
    /// `size` falls back to the configured category default; `immediate`
    /// bypasses lazy deferral for this call.
    pub fn queue_game_thumbnail(
        &self,
        universe_id: u64,
        slot: Arc<dyn ImageSlot>,
        size: Option<&str>,
        immediate: bool,
    ) {
        LoaderShared::queue(
            &self.shared,
            Category::GameThumbnail,
            universe_id,
            slot,
            size,
            immediate,
        );
    }

    /// Queue a square game icon for `universe_id` into `slot`
    pub fn queue_game_icon(
        &self,
        universe_id: u64,
        slot: Arc<dyn ImageSlot>,
        size: Option<&str>,
        immediate: bool,
    ) {
        LoaderShared::queue(
            &self.shared,
            Category::GameIcon,
            universe_id,
            slot,
            size,
            immediate,
        );
    }

    /// Queue an avatar headshot for `user_id` into `slot`
    pub fn queue_user_avatar(
        &self,
        user_id: u64,
        slot: Arc<dyn ImageSlot>,
        size: Option<&str>,
        immediate: bool,
    ) {
        LoaderShared::queue(
            &self.shared,
            Category::UserAvatar,
            user_id,
            slot,
            size,
            immediate,
        );
    }

    /// Cancel every armed debounce timer, drop every pending request and
    /// empty the lazy queue
    ///
    /// Batches already awaiting a host response are not affected.
    /// Idempotent.
    pub fn clear_pending(&self) {
        self.shared.clear_pending();
    }

    /// Clear all pending work and disconnect the viewport observer
    ///
    /// The loader ignores queue calls afterwards.
    pub fn destroy(&self) {
        if self.shared.destroyed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.shared.clear_pending();
        if let Some(viewport) = &self.shared.viewport {
            viewport.disconnect();
        }
    }

    /// Promote every lazily parked element into its pending queue now,
    /// without waiting for viewport intersection
    pub fn load_all_lazy(&self) {
        LoaderShared::load_all_lazy(&self.shared);
    }

    /// Current size of each category's pending queue
    pub fn pending_counts(&self) -> PendingCounts {
        let shared = &self.shared;
        PendingCounts {
            game_thumbnails: shared.category(Category::GameThumbnail).pending.lock().len(),
            game_icons: shared.category(Category::GameIcon).pending.lock().len(),
            user_avatars: shared.category(Category::UserAvatar).pending.lock().len(),
        }
    }

    /// Number of elements parked in the lazy queue
    pub fn lazy_count(&self) -> usize {
        self.shared.lazy.lock().len()
    }

    /// Host capability flags, snapshotted at construction
    pub fn capabilities(&self) -> FetcherCapabilities {
        self.shared.capabilities
    }

    /// Counter handle for batching and resolution behavior
    pub fn metrics(&self) -> &LoaderMetricsHandle {
        &self.shared.metrics
    }
}

impl<F: ThumbnailFetcher + 'static, S: AsyncSpawner + 'static> LoaderShared<F, S> {
    fn category(&self, category: Category) -> &CategoryState {
        &self.categories[category.index()]
    }

    /// Single entry path behind the three public queue methods
    fn queue(
        shared: &Arc<Self>,
        category: Category,
        entity_id: u64,
        slot: Arc<dyn ImageSlot>,
        size: Option<&str>,
        immediate: bool,
    ) {
        if shared.destroyed.load(Ordering::SeqCst) {
            debug!("ignoring {category} request, loader destroyed");
            return;
        }
        if entity_id == 0 {
            warn!("ignoring {category} request with zero entity id");
            return;
        }

        let size = size
            .map(str::to_string)
            .unwrap_or_else(|| shared.config.default_size(category).to_string());

        // Placeholder first, so the element renders something while the
        // batch is in flight. Skipped once a real image has landed.
        if !slot.is_loaded() {
            slot.set_source(shared.config.placeholder(category));
        }

        if !immediate && shared.lazy_enabled {
            if let Some(viewport) = shared.viewport.clone() {
                Self::defer_until_visible(shared, viewport, category, entity_id, size, slot);
                return;
            }
        }

        // An element must not sit in both the lazy queue and a pending
        // queue; a direct enqueue supersedes any parked entry.
        shared.remove_lazy(slot.slot_id());

        shared.enqueue(category, entity_id, size, slot);
        Self::schedule_drain(shared, category);
    }

    fn defer_until_visible(
        shared: &Arc<Self>,
        viewport: Arc<dyn ViewportObserver>,
        category: Category,
        entity_id: u64,
        size: String,
        slot: Arc<dyn ImageSlot>,
    ) {
        let slot_id = slot.slot_id();

        shared.lazy.lock().insert(
            slot_id,
            LazyRequest {
                category,
                entity_id,
                size,
                slot,
            },
        );

        let weak: Weak<Self> = Arc::downgrade(shared);
        viewport.observe(
            slot_id,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    Self::promote_lazy(&shared, slot_id);
                }
            }),
        );
    }

    /// Move one parked element into its pending queue
    ///
    /// The lazy map is the authority: a callback that fires after the entry
    /// was flushed or cleared finds nothing and does nothing, which keeps
    /// enqueues at-most-once per queue call.
    fn promote_lazy(shared: &Arc<Self>, slot_id: u64) {
        let Some(request) = shared.lazy.lock().remove(&slot_id) else {
            return;
        };
        if let Some(viewport) = &shared.viewport {
            viewport.unobserve(slot_id);
        }
        shared.enqueue(request.category, request.entity_id, request.size, request.slot);
        Self::schedule_drain(shared, request.category);
    }

    fn load_all_lazy(shared: &Arc<Self>) {
        let drained: Vec<(u64, LazyRequest)> = shared.lazy.lock().drain().collect();
        if drained.is_empty() {
            return;
        }

        let mut touched = [false; 3];
        for (slot_id, request) in drained {
            if let Some(viewport) = &shared.viewport {
                viewport.unobserve(slot_id);
            }
            touched[request.category.index()] = true;
            shared.enqueue(request.category, request.entity_id, request.size, request.slot);
        }
        for category in Category::ALL {
            if touched[category.index()] {
                Self::schedule_drain(shared, category);
            }
        }
    }

    fn remove_lazy(&self, slot_id: u64) {
        if self.lazy.lock().remove(&slot_id).is_some() {
            if let Some(viewport) = &self.viewport {
                viewport.unobserve(slot_id);
            }
        }
    }

    fn enqueue(&self, category: Category, entity_id: u64, size: String, slot: Arc<dyn ImageSlot>) {
        let coalesced = self
            .category(category)
            .pending
            .lock()
            .enqueue(entity_id, size, slot);
        if coalesced {
            self.metrics.record_coalesced();
        }
    }

    /// Arm (or re-arm) the category's debounce timer
    ///
    /// Every call bumps the generation, so only the most recent timer task
    /// survives its sleep; the burst settles into a single drain.
    fn schedule_drain(shared: &Arc<Self>, category: Category) {
        let generation = shared
            .category(category)
            .generation
            .fetch_add(1, Ordering::SeqCst)
            + 1;
        let delay = shared.config.batch_delay;
        let task_shared = Arc::clone(shared);

        shared.spawner.spawn(async move {
            task_shared.spawner.sleep(delay).await;
            if task_shared
                .category(category)
                .generation
                .load(Ordering::SeqCst)
                != generation
            {
                // Superseded by a later enqueue or a clear
                return;
            }
            task_shared.drain_category(category).await;
        });
    }

    /// Fire one category's batch: drain, group by size, chunk, fetch, map
    async fn drain_category(&self, category: Category) {
        if self.destroyed.load(Ordering::SeqCst) {
            return;
        }

        // Single synchronous take-and-clear; enqueues racing this drain
        // land in a fresh queue with their own timer.
        let taken: Vec<PendingRequest> = self.category(category).pending.lock().drain();
        if taken.is_empty() {
            return;
        }

        if !self.capabilities.supports(category) {
            warn!(
                "adapter {} has no {category} endpoint, dropping {} request(s)",
                self.fetcher.adapter_name(),
                taken.len()
            );
            self.metrics.record_capability_miss();
            return;
        }

        self.metrics.record_batch();

        // The host takes one size per call, so partition the drain by size,
        // preserving first-appearance order.
        let mut groups: Vec<(String, Vec<PendingRequest>)> = Vec::new();
        for request in taken {
            match groups.iter_mut().find(|(size, _)| *size == request.size) {
                Some((_, requests)) => requests.push(request),
                None => groups.push((request.size.clone(), vec![request])),
            }
        }

        for (size, requests) in groups {
            // Chunks go out strictly one at a time: at most one in-flight
            // host call per category.
            for chunk in requests.chunks(self.config.max_batch_size) {
                let ids: Vec<u64> = chunk.iter().map(|request| request.entity_id).collect();
                match self.fetch_chunk(category, &ids, &size).await {
                    Ok(results) => self.apply_results(category, chunk, &results),
                    Err(error) => {
                        warn!("{category} chunk of {} id(s) failed: {error}", ids.len());
                        self.metrics.record_failed_chunk();
                    }
                }
            }
        }
    }

    async fn fetch_chunk(
        &self,
        category: Category,
        ids: &[u64],
        size: &str,
    ) -> FetchResult<Vec<ThumbnailResult>> {
        match category {
            Category::GameThumbnail => self.fetcher.fetch_game_thumbnails(ids, size).await,
            Category::GameIcon => self.fetcher.fetch_game_icons(ids, size).await,
            Category::UserAvatar => self.fetcher.fetch_user_avatars(ids, size).await,
        }
    }

    /// Map one chunk's response back onto every element that asked for it
    fn apply_results(
        &self,
        category: Category,
        requests: &[PendingRequest],
        results: &[ThumbnailResult],
    ) {
        let resolved: HashMap<u64, &str> = results
            .iter()
            .filter(|result| result.is_resolved())
            .filter_map(|result| {
                result
                    .image_url
                    .as_deref()
                    .map(|url| (result.target_id, url))
            })
            .collect();

        for request in requests {
            match resolved.get(&request.entity_id) {
                Some(url) => {
                    for slot in &request.slots {
                        slot.set_source(url);
                        slot.mark_loaded();
                    }
                    self.metrics.record_resolved(request.slots.len());
                }
                None => {
                    // Omitted or uncompleted: stays on the placeholder, no
                    // retry is scheduled.
                    trace!("{category} {} unresolved", request.entity_id);
                    self.metrics.record_unresolved();
                }
            }
        }
    }

    fn clear_pending(&self) {
        for state in &self.categories {
            // Invalidate any armed timer before dropping its work
            state.generation.fetch_add(1, Ordering::SeqCst);
            state.pending.lock().clear();
        }

        let parked: Vec<u64> = self.lazy.lock().drain().map(|(slot_id, _)| slot_id).collect();
        if let Some(viewport) = &self.viewport {
            for slot_id in parked {
                viewport.unobserve(slot_id);
            }
        }
    }
}
