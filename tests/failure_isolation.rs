//! Integration tests for failure containment
//!
//! Queue calls are fire-and-forget: a failed or unsupported host call may
//! only ever leave elements on their placeholder.

#![cfg(feature = "runtime-tokio")]

use std::time::Duration;

use thumbflow::{
    Category, FetchError, FetcherCapabilities, ImageCell, ImageSlot, LoaderConfig, MockFetcher,
    ThumbnailLoader, ThumbnailState, TokioSpawner,
};

fn loader_with(
    fetcher: &MockFetcher,
    config: LoaderConfig,
) -> ThumbnailLoader<MockFetcher, TokioSpawner> {
    ThumbnailLoader::new(fetcher.clone(), TokioSpawner::new(), config)
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

#[tokio::test(start_paused = true)]
async fn failed_chunk_does_not_poison_its_neighbors() {
    let fetcher = MockFetcher::new();
    for id in [1, 2, 3] {
        fetcher.seed_url(Category::GameIcon, id, format!("https://cdn/icon-{id}.png"));
    }
    // First chunk of the drain rejects, second succeeds
    fetcher.push_failure(Category::GameIcon, FetchError::Transport("timeout".into()));

    let loader = loader_with(
        &fetcher,
        LoaderConfig {
            max_batch_size: 2,
            lazy_loading: false,
            ..LoaderConfig::default()
        },
    );

    let el_a = ImageCell::shared();
    let el_b = ImageCell::shared();
    let el_c = ImageCell::shared();
    loader.queue_game_icon(1, el_a.clone(), None, false);
    loader.queue_game_icon(2, el_b.clone(), None, false);
    loader.queue_game_icon(3, el_c.clone(), None, false);

    let placeholder = el_a.current_source();
    settle().await;

    // Both chunks went out despite the first failing
    assert_eq!(fetcher.call_count(Category::GameIcon), 2);
    assert_eq!(el_a.current_source(), placeholder);
    assert_eq!(el_b.current_source(), placeholder);
    assert_eq!(el_c.current_source(), "https://cdn/icon-3.png");
    assert_eq!(loader.metrics().failed_chunks(), 1);
}

#[tokio::test(start_paused = true)]
async fn failed_category_does_not_affect_others() {
    let fetcher = MockFetcher::new();
    fetcher.seed_url(Category::GameIcon, 1, "https://cdn/icon-1.png");
    fetcher.push_failure(Category::UserAvatar, FetchError::Rejected("500".into()));

    let loader = loader_with(
        &fetcher,
        LoaderConfig {
            lazy_loading: false,
            ..LoaderConfig::default()
        },
    );

    let avatar = ImageCell::shared();
    let icon = ImageCell::shared();
    loader.queue_user_avatar(7, avatar.clone(), None, false);
    loader.queue_game_icon(1, icon.clone(), None, false);

    settle().await;

    assert_eq!(avatar.current_source(), "/img/placeholders/avatar.png");
    assert_eq!(icon.current_source(), "https://cdn/icon-1.png");
}

#[tokio::test(start_paused = true)]
async fn missing_capability_drops_the_batch_quietly() {
    let fetcher = MockFetcher::with_capabilities(FetcherCapabilities {
        game_thumbnails: true,
        game_icons: true,
        user_avatars: false,
    });
    fetcher.seed_url(Category::GameIcon, 1, "https://cdn/icon-1.png");

    let loader = loader_with(
        &fetcher,
        LoaderConfig {
            lazy_loading: false,
            ..LoaderConfig::default()
        },
    );
    assert!(!loader.capabilities().supports(Category::UserAvatar));

    let avatar = ImageCell::shared();
    let icon = ImageCell::shared();
    loader.queue_user_avatar(7, avatar.clone(), None, false);
    loader.queue_game_icon(1, icon.clone(), None, false);

    settle().await;

    // No avatar call was attempted; the icon category was untouched
    assert_eq!(fetcher.call_count(Category::UserAvatar), 0);
    assert_eq!(fetcher.call_count(Category::GameIcon), 1);
    assert_eq!(avatar.current_source(), "/img/placeholders/avatar.png");
    assert_eq!(icon.current_source(), "https://cdn/icon-1.png");
    assert_eq!(loader.metrics().capability_misses(), 1);
    // The drained requests are gone, not stuck
    assert_eq!(loader.pending_counts().total(), 0);
}

#[tokio::test(start_paused = true)]
async fn uncompleted_state_leaves_the_placeholder() {
    let fetcher = MockFetcher::new();
    fetcher.seed_state(Category::GameThumbnail, 9, ThumbnailState::Pending);

    let loader = loader_with(
        &fetcher,
        LoaderConfig {
            lazy_loading: false,
            ..LoaderConfig::default()
        },
    );

    let cell = ImageCell::shared();
    loader.queue_game_thumbnail(9, cell.clone(), None, false);
    settle().await;

    assert_eq!(cell.current_source(), "/img/placeholders/game.png");
    assert!(!cell.is_loaded());
    assert_eq!(loader.metrics().unresolved_requests(), 1);
}

#[tokio::test(start_paused = true)]
async fn clear_pending_cancels_the_armed_timer() {
    let fetcher = MockFetcher::new();
    let loader = loader_with(
        &fetcher,
        LoaderConfig {
            lazy_loading: false,
            ..LoaderConfig::default()
        },
    );

    loader.queue_game_icon(1, ImageCell::shared(), None, false);
    loader.clear_pending();

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(fetcher.total_calls(), 0);
    assert_eq!(loader.pending_counts().total(), 0);
}

#[tokio::test(start_paused = true)]
async fn queueing_after_a_failure_works_again() {
    let fetcher = MockFetcher::new();
    fetcher.seed_url(Category::GameIcon, 1, "https://cdn/icon-1.png");
    fetcher.push_failure(Category::GameIcon, FetchError::Transport("reset".into()));

    let loader = loader_with(
        &fetcher,
        LoaderConfig {
            lazy_loading: false,
            ..LoaderConfig::default()
        },
    );

    let cell = ImageCell::shared();
    loader.queue_game_icon(1, cell.clone(), None, false);
    settle().await;
    assert_eq!(cell.current_source(), "/img/placeholders/game.png");

    // No automatic retry happened; an explicit re-queue resolves
    loader.queue_game_icon(1, cell.clone(), None, false);
    settle().await;
    assert_eq!(cell.current_source(), "https://cdn/icon-1.png");
    assert_eq!(fetcher.call_count(Category::GameIcon), 2);
}
