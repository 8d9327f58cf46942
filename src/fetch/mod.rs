//! Host thumbnail API abstraction
//!
//! This module provides traits and implementations for the batch thumbnail
//! endpoints, allowing the loader to work with any host backend.

pub mod mock;
#[cfg(feature = "fetch-http")]
pub mod http;

use std::fmt;
use thiserror::Error;

/// Error type for fetch operations
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("host does not expose a batch endpoint for {0}")]
    MissingCapability(Category),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("host rejected the call: {0}")]
    Rejected(String),

    #[error("malformed host response: {0}")]
    InvalidResponse(String),

    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),

    #[cfg(feature = "fetch-http")]
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;

/// Resource category served by the host batch endpoints
///
/// Each category maps to one host method and one id namespace
/// (universe ids for the game categories, user ids for avatars).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Wide game tile imagery
    GameThumbnail,
    /// Square game icon
    GameIcon,
    /// User avatar headshot
    UserAvatar,
}

impl Category {
    /// All categories, in drain order
    pub const ALL: [Category; 3] = [
        Category::GameThumbnail,
        Category::GameIcon,
        Category::UserAvatar,
    ];

    /// Stable index for per-category state tables
    pub(crate) fn index(self) -> usize {
        match self {
            Category::GameThumbnail => 0,
            Category::GameIcon => 1,
            Category::UserAvatar => 2,
        }
    }

    /// Short label used in logs
    pub fn label(self) -> &'static str {
        match self {
            Category::GameThumbnail => "game-thumbnail",
            Category::GameIcon => "game-icon",
            Category::UserAvatar => "user-avatar",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Processing state reported by the host for one thumbnail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "fetch-http", derive(serde::Deserialize))]
pub enum ThumbnailState {
    /// Ready; `image_url` is usable
    Completed,
    /// Still being generated host-side
    Pending,
    /// Moderated content, no image will be produced
    Blocked,
    /// Host-side failure for this id
    Error,
    /// Any state string this client does not know
    #[cfg_attr(feature = "fetch-http", serde(other))]
    Unknown,
}

/// One entry of a batch response
///
/// An entry only resolves an image when `state` is [`ThumbnailState::Completed`]
/// and `image_url` is a non-empty string; everything else leaves the
/// requesting elements on their placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailResult {
    /// Entity the entry answers for (universe id or user id)
    pub target_id: u64,
    /// Host processing state
    pub state: ThumbnailState,
    /// Resolved image URL, when completed
    pub image_url: Option<String>,
}

impl ThumbnailResult {
    /// A completed entry with a resolved URL
    pub fn completed(target_id: u64, image_url: impl Into<String>) -> Self {
        Self {
            target_id,
            state: ThumbnailState::Completed,
            image_url: Some(image_url.into()),
        }
    }

    /// An entry still pending host-side
    pub fn pending(target_id: u64) -> Self {
        Self {
            target_id,
            state: ThumbnailState::Pending,
            image_url: None,
        }
    }

    /// True when this entry carries a usable image URL
    pub fn is_resolved(&self) -> bool {
        self.state == ThumbnailState::Completed
            && self.image_url.as_deref().is_some_and(|url| !url.is_empty())
    }
}

/// Capability flags negotiated once at loader construction
///
/// Replaces per-call duck-typed probing of the host surface: the loader
/// snapshots these at construction and skips a category's batches when the
/// host lacks its endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetcherCapabilities {
    pub game_thumbnails: bool,
    pub game_icons: bool,
    pub user_avatars: bool,
}

impl FetcherCapabilities {
    /// Every endpoint available
    pub fn all() -> Self {
        Self {
            game_thumbnails: true,
            game_icons: true,
            user_avatars: true,
        }
    }

    /// No endpoint available
    pub fn none() -> Self {
        Self {
            game_thumbnails: false,
            game_icons: false,
            user_avatars: false,
        }
    }

    /// Whether the host serves the given category
    pub fn supports(&self, category: Category) -> bool {
        match category {
            Category::GameThumbnail => self.game_thumbnails,
            Category::GameIcon => self.game_icons,
            Category::UserAvatar => self.user_avatars,
        }
    }
}

impl Default for FetcherCapabilities {
    fn default() -> Self {
        Self::all()
    }
}

/// Core host adapter trait for batch thumbnail fetching
///
/// This trait abstracts the three host batch endpoints, allowing the loader
/// to work with any backend (HTTP, IPC, Mock, etc.). Each call accepts a
/// batch of ids plus an opaque size string and returns one entry per id;
/// ids the host cannot answer for may be omitted.
///
/// # Example
/// ```ignore
/// let fetcher = MockFetcher::new();
/// fetcher.seed_url(Category::GameIcon, 42, "https://cdn/icon-42.png");
/// let results = fetcher.fetch_game_icons(&[42], "150x150").await?;
/// ```
#[async_trait::async_trait]
pub trait ThumbnailFetcher: Send + Sync {
    /// Which endpoints this adapter can serve
    ///
    /// Queried once when a loader is built.
    fn capabilities(&self) -> FetcherCapabilities {
        FetcherCapabilities::all()
    }

    /// Batch-fetch wide game thumbnails for the given universe ids
    async fn fetch_game_thumbnails(
        &self,
        universe_ids: &[u64],
        size: &str,
    ) -> FetchResult<Vec<ThumbnailResult>>;

    /// Batch-fetch square game icons for the given universe ids
    async fn fetch_game_icons(
        &self,
        universe_ids: &[u64],
        size: &str,
    ) -> FetchResult<Vec<ThumbnailResult>>;

    /// Batch-fetch avatar headshots for the given user ids
    async fn fetch_user_avatars(
        &self,
        user_ids: &[u64],
        size: &str,
    ) -> FetchResult<Vec<ThumbnailResult>>;

    /// Get the name of this adapter (for debugging)
    fn adapter_name(&self) -> &'static str;
}

// Re-export implementations
pub use mock::MockFetcher;

#[cfg(feature = "fetch-http")]
pub use http::HttpFetcher;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_labels() {
        assert_eq!(Category::GameThumbnail.label(), "game-thumbnail");
        assert_eq!(Category::UserAvatar.to_string(), "user-avatar");
    }

    #[test]
    fn test_category_indices_are_distinct() {
        let mut seen = [false; 3];
        for category in Category::ALL {
            assert!(!seen[category.index()]);
            seen[category.index()] = true;
        }
    }

    #[test]
    fn test_result_resolution_rules() {
        assert!(ThumbnailResult::completed(1, "https://cdn/a.png").is_resolved());
        assert!(!ThumbnailResult::pending(1).is_resolved());

        // Completed but empty URL does not count as resolved
        let empty = ThumbnailResult {
            target_id: 1,
            state: ThumbnailState::Completed,
            image_url: Some(String::new()),
        };
        assert!(!empty.is_resolved());

        let missing = ThumbnailResult {
            target_id: 1,
            state: ThumbnailState::Completed,
            image_url: None,
        };
        assert!(!missing.is_resolved());
    }

    #[test]
    fn test_capability_flags() {
        let caps = FetcherCapabilities {
            game_thumbnails: true,
            game_icons: false,
            user_avatars: true,
        };
        assert!(caps.supports(Category::GameThumbnail));
        assert!(!caps.supports(Category::GameIcon));
        assert!(caps.supports(Category::UserAvatar));

        assert!(FetcherCapabilities::all().supports(Category::GameIcon));
        assert!(!FetcherCapabilities::none().supports(Category::GameIcon));
    }
}
