//! Mock fetcher implementation for testing
//!
//! Provides a mock host adapter that serves seeded URLs from memory for
//! testing without requiring an actual host API.

use super::{
    Category, FetchError, FetchResult, FetcherCapabilities, ThumbnailFetcher, ThumbnailResult,
    ThumbnailState,
};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// One recorded host call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedFetch {
    /// Category the call was issued for
    pub category: Category,
    /// Entity ids, in the order they were sent
    pub ids: Vec<u64>,
    /// Size string the call carried
    pub size: String,
}

#[derive(Default)]
struct MockFetcherInner {
    calls: Mutex<Vec<RecordedFetch>>,
    urls: Mutex<HashMap<(Category, u64), String>>,
    states: Mutex<HashMap<(Category, u64), ThumbnailState>>,
    failures: Mutex<HashMap<Category, VecDeque<FetchError>>>,
}

/// Mock host adapter for testing
///
/// Serves URLs seeded via [`seed_url`](MockFetcher::seed_url), records every
/// call for inspection, and can be scripted to fail specific calls. Clones
/// share state, so a test can keep a handle after moving one into a loader.
#[derive(Clone, Default)]
pub struct MockFetcher {
    inner: Arc<MockFetcherInner>,
    capabilities: FetcherCapabilities,
}

impl MockFetcher {
    /// Create a mock serving every category
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MockFetcherInner::default()),
            capabilities: FetcherCapabilities::all(),
        }
    }

    /// Create a mock with specific capability flags
    pub fn with_capabilities(capabilities: FetcherCapabilities) -> Self {
        Self {
            inner: Arc::new(MockFetcherInner::default()),
            capabilities,
        }
    }

    /// Seed the URL returned for an id within a category
    pub fn seed_url(&self, category: Category, id: u64, url: impl Into<String>) {
        self.inner.urls.lock().insert((category, id), url.into());
    }

    /// Seed a non-completed state for an id (e.g. still pending host-side)
    pub fn seed_state(&self, category: Category, id: u64, state: ThumbnailState) {
        self.inner.states.lock().insert((category, id), state);
    }

    /// Script the next call for a category to fail with the given error
    ///
    /// Failures queue up: each call consumes one, then calls succeed again.
    pub fn push_failure(&self, category: Category, error: FetchError) {
        self.inner
            .failures
            .lock()
            .entry(category)
            .or_default()
            .push_back(error);
    }

    /// Every call recorded so far
    pub fn calls(&self) -> Vec<RecordedFetch> {
        self.inner.calls.lock().clone()
    }

    /// Number of calls recorded for a category
    pub fn call_count(&self, category: Category) -> usize {
        self.inner
            .calls
            .lock()
            .iter()
            .filter(|call| call.category == category)
            .count()
    }

    /// Total number of calls recorded
    pub fn total_calls(&self) -> usize {
        self.inner.calls.lock().len()
    }

    fn serve(&self, category: Category, ids: &[u64], size: &str) -> FetchResult<Vec<ThumbnailResult>> {
        self.inner.calls.lock().push(RecordedFetch {
            category,
            ids: ids.to_vec(),
            size: size.to_string(),
        });

        // Direct trait calls against a disabled category get the typed
        // error; loaders consult the flags and never reach this.
        if !self.capabilities.supports(category) {
            return Err(FetchError::MissingCapability(category));
        }

        if let Some(error) = self
            .inner
            .failures
            .lock()
            .get_mut(&category)
            .and_then(VecDeque::pop_front)
        {
            return Err(error);
        }

        let urls = self.inner.urls.lock();
        let states = self.inner.states.lock();
        let results = ids
            .iter()
            .filter_map(|&id| {
                if let Some(&state) = states.get(&(category, id)) {
                    return Some(ThumbnailResult {
                        target_id: id,
                        state,
                        image_url: None,
                    });
                }
                // Unseeded ids are omitted from the response entirely
                urls.get(&(category, id))
                    .map(|url| ThumbnailResult::completed(id, url.clone()))
            })
            .collect();

        Ok(results)
    }
}

#[async_trait::async_trait]
impl ThumbnailFetcher for MockFetcher {
    fn capabilities(&self) -> FetcherCapabilities {
        self.capabilities
    }

    async fn fetch_game_thumbnails(
        &self,
        universe_ids: &[u64],
        size: &str,
    ) -> FetchResult<Vec<ThumbnailResult>> {
        self.serve(Category::GameThumbnail, universe_ids, size)
    }

    async fn fetch_game_icons(
        &self,
        universe_ids: &[u64],
        size: &str,
    ) -> FetchResult<Vec<ThumbnailResult>> {
        self.serve(Category::GameIcon, universe_ids, size)
    }

    async fn fetch_user_avatars(
        &self,
        user_ids: &[u64],
        size: &str,
    ) -> FetchResult<Vec<ThumbnailResult>> {
        self.serve(Category::UserAvatar, user_ids, size)
    }

    fn adapter_name(&self) -> &'static str {
        "Mock"
    }
}
