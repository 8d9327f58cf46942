//! Loader configuration

use crate::error::{Result, ThumbError};
use crate::fetch::Category;
use std::time::Duration;

/// Configuration for the thumbnail loader
///
/// All fields have working defaults; construct with struct-update syntax to
/// override a subset:
///
/// ```ignore
/// let config = LoaderConfig {
///     max_batch_size: 25,
///     ..LoaderConfig::default()
/// };
/// ```
#[derive(Clone, Debug)]
pub struct LoaderConfig {
    /// Debounce window: a category's batch fires after this long with no
    /// new enqueue for that category
    pub batch_delay: Duration,
    /// Cap on distinct ids per outbound host call; larger drains are split
    /// into sequential chunks
    pub max_batch_size: usize,
    /// Defer fetches until elements near the viewport (requires an observer)
    pub lazy_loading: bool,
    /// Default size for wide game thumbnails
    pub game_thumbnail_size: String,
    /// Default size for square game icons
    pub game_icon_size: String,
    /// Default size for avatar headshots
    pub user_avatar_size: String,
    /// Placeholder applied to game tiles and icons while unresolved
    pub game_placeholder: String,
    /// Placeholder applied to avatars while unresolved
    pub avatar_placeholder: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            batch_delay: Duration::from_millis(30),
            max_batch_size: 50,
            lazy_loading: true,
            game_thumbnail_size: "768x432".to_string(),
            game_icon_size: "150x150".to_string(),
            user_avatar_size: "150x150".to_string(),
            game_placeholder: "/img/placeholders/game.png".to_string(),
            avatar_placeholder: "/img/placeholders/avatar.png".to_string(),
        }
    }
}

impl LoaderConfig {
    /// Default size string for a category
    pub fn default_size(&self, category: Category) -> &str {
        match category {
            Category::GameThumbnail => &self.game_thumbnail_size,
            Category::GameIcon => &self.game_icon_size,
            Category::UserAvatar => &self.user_avatar_size,
        }
    }

    /// Placeholder path for a category
    pub fn placeholder(&self, category: Category) -> &str {
        match category {
            Category::GameThumbnail | Category::GameIcon => &self.game_placeholder,
            Category::UserAvatar => &self.avatar_placeholder,
        }
    }

    /// Check the configuration for unusable values
    pub fn validate(&self) -> Result<()> {
        if self.max_batch_size == 0 {
            return Err(ThumbError::InvalidConfig(
                "max_batch_size must be at least 1".to_string(),
            ));
        }
        if self.batch_delay > Duration::from_secs(10) {
            return Err(ThumbError::InvalidConfig(format!(
                "batch_delay of {:?} would stall rendering",
                self.batch_delay
            )));
        }
        for category in Category::ALL {
            if self.default_size(category).is_empty() {
                return Err(ThumbError::InvalidConfig(format!(
                    "default size for {category} is empty"
                )));
            }
        }
        Ok(())
    }
}
