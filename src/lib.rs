//! thumbflow - Batched, coalescing, lazy-loading thumbnail fetching
//!
//! # Features
//! - Request coalescing (one fetch per distinct id + size)
//! - Debounced batching with sequential, size-capped chunks
//! - Viewport-driven lazy loading via an injected observer
//! - Placeholder-first rendering; resolved URLs swap in asynchronously
//! - Host adapter abstraction (HTTP, Mock, custom via trait)
//! - Async runtime abstraction (Tokio, custom)
//!
//! # Quick Start
//!
//! ```ignore
//! use thumbflow::{ImageCell, LoaderConfig, MockFetcher, ThumbnailLoader, TokioSpawner};
//!
//! let loader = ThumbnailLoader::new(MockFetcher::new(), TokioSpawner::new(), LoaderConfig::default());
//! let tile = ImageCell::shared();
//! loader.queue_game_icon(1818, tile.clone(), None, false);
//! // tile shows the placeholder now and the real icon once the batch lands
//! ```
//!
//! # Feature Flags
//!
//! - `runtime-tokio`: Enable the Tokio spawner/timer backend (default)
//! - `fetch-http`: Enable the reqwest adapter for the hosted thumbnail API

// Core modules
pub mod config;
pub mod fetch;
pub mod loader;
pub mod runtime;
pub mod slot;
pub mod viewport;

// Error types
mod error;
pub use error::{Result, ThumbError};

// Re-export main types from the loader
pub use loader::metrics::{LoaderMetrics, LoaderMetricsHandle};
pub use loader::{PendingCounts, ThumbnailLoader};

// Re-export configuration
pub use config::LoaderConfig;

// Re-export fetch types
pub use fetch::mock::{MockFetcher, RecordedFetch};
#[cfg(feature = "fetch-http")]
pub use fetch::http::HttpFetcher;
pub use fetch::{
    Category, FetchError, FetchResult, FetcherCapabilities, ThumbnailFetcher, ThumbnailResult,
    ThumbnailState,
};

// Re-export runtime types
pub use runtime::mock::MockSpawner;
#[cfg(feature = "runtime-tokio")]
pub use runtime::tokio_impl::TokioSpawner;
pub use runtime::{AsyncSpawner, BoxFuture, JoinHandle};

// Re-export slot types
pub use slot::{ImageCell, ImageSlot};

// Re-export viewport types
pub use viewport::{ManualViewport, ViewportObserver};

// Version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
