//! Integration tests for coalescing, debounce and chunk behavior
//!
//! Runs on a paused tokio clock: sleeps auto-advance, so every debounce
//! window elapses deterministically and instantly.

#![cfg(feature = "runtime-tokio")]

use std::time::Duration;

use thumbflow::{
    Category, ImageCell, ImageSlot, LoaderConfig, MockFetcher, ThumbnailLoader, TokioSpawner,
};

fn loader_with(
    fetcher: &MockFetcher,
    config: LoaderConfig,
) -> ThumbnailLoader<MockFetcher, TokioSpawner> {
    ThumbnailLoader::new(fetcher.clone(), TokioSpawner::new(), config)
}

/// Sleep past the default 30ms debounce window
async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

#[tokio::test(start_paused = true)]
async fn same_image_coalesces_into_one_call() {
    let fetcher = MockFetcher::new();
    fetcher.seed_url(Category::UserAvatar, 7, "https://cdn/avatar-7.png");
    let loader = loader_with(&fetcher, LoaderConfig::default());

    let el_a = ImageCell::shared();
    let el_b = ImageCell::shared();
    loader.queue_user_avatar(7, el_a.clone(), None, false);
    loader.queue_user_avatar(7, el_b.clone(), None, false);

    // Both callers collapse into one distinct pending request
    assert_eq!(loader.pending_counts().user_avatars, 1);

    settle().await;

    let calls = fetcher.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].ids, vec![7]);

    assert_eq!(el_a.current_source(), "https://cdn/avatar-7.png");
    assert_eq!(el_b.current_source(), "https://cdn/avatar-7.png");
    assert_eq!(loader.metrics().coalesced_requests(), 1);
    assert_eq!(loader.metrics().resolved_slots(), 2);
}

#[tokio::test(start_paused = true)]
async fn burst_fires_exactly_one_batch() {
    let fetcher = MockFetcher::new();
    let loader = loader_with(&fetcher, LoaderConfig::default());

    for id in 1..=5 {
        loader.queue_game_icon(id, ImageCell::shared(), None, false);
    }
    settle().await;

    assert_eq!(fetcher.call_count(Category::GameIcon), 1);
    assert_eq!(loader.metrics().batches_fired(), 1);
}

#[tokio::test(start_paused = true)]
async fn requeue_inside_window_restarts_the_timer() {
    let fetcher = MockFetcher::new();
    let loader = loader_with(&fetcher, LoaderConfig::default());

    loader.queue_game_icon(1, ImageCell::shared(), None, false);
    // Still inside the 30ms window: the armed timer must restart, not fire
    tokio::time::sleep(Duration::from_millis(20)).await;
    loader.queue_game_icon(2, ImageCell::shared(), None, false);
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(fetcher.total_calls(), 0);

    settle().await;

    let calls = fetcher.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].ids, vec![1, 2]);
}

#[tokio::test(start_paused = true)]
async fn sizes_partition_into_separate_calls() {
    let fetcher = MockFetcher::new();
    let loader = loader_with(&fetcher, LoaderConfig::default());

    loader.queue_game_icon(1, ImageCell::shared(), Some("150x150"), false);
    loader.queue_game_icon(2, ImageCell::shared(), Some("50x50"), false);
    settle().await;

    let calls = fetcher.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].size, "150x150");
    assert_eq!(calls[0].ids, vec![1]);
    assert_eq!(calls[1].size, "50x50");
    assert_eq!(calls[1].ids, vec![2]);
}

#[tokio::test(start_paused = true)]
async fn oversized_drain_splits_into_capped_chunks() {
    let fetcher = MockFetcher::new();
    let loader = loader_with(
        &fetcher,
        LoaderConfig {
            max_batch_size: 2,
            lazy_loading: false,
            ..LoaderConfig::default()
        },
    );

    for id in [1, 2, 3, 4, 5] {
        loader.queue_game_icon(id, ImageCell::shared(), None, false);
    }
    settle().await;

    // ceil(5 / 2) calls, in enqueue order, none above the cap
    let calls = fetcher.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0].ids, vec![1, 2]);
    assert_eq!(calls[1].ids, vec![3, 4]);
    assert_eq!(calls[2].ids, vec![5]);
    assert!(calls.iter().all(|call| call.ids.len() <= 2));
}

#[tokio::test(start_paused = true)]
async fn partial_response_resolves_only_matched_elements() {
    // The concrete contract scenario: cap 2, eager, three icons queued,
    // host answers for id 20 only.
    let fetcher = MockFetcher::new();
    fetcher.seed_url(Category::GameIcon, 20, "https://cdn/icon-20.png");
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
    loader.queue_game_icon(10, el_a.clone(), None, false);
    loader.queue_game_icon(20, el_b.clone(), None, false);
    loader.queue_game_icon(30, el_c.clone(), None, false);

    let placeholder = el_a.current_source();
    settle().await;

    let calls = fetcher.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].ids, vec![10, 20]);
    assert_eq!(calls[1].ids, vec![30]);

    assert_eq!(el_b.current_source(), "https://cdn/icon-20.png");
    assert!(el_b.is_loaded());
    assert_eq!(el_a.current_source(), placeholder);
    assert_eq!(el_c.current_source(), placeholder);
    assert!(!el_a.is_loaded());
    assert_eq!(loader.metrics().unresolved_requests(), 2);
}

#[tokio::test(start_paused = true)]
async fn placeholder_shows_before_the_batch_fires() {
    let fetcher = MockFetcher::new();
    fetcher.seed_url(Category::GameThumbnail, 3, "https://cdn/tile-3.png");
    let loader = loader_with(&fetcher, LoaderConfig::default());

    let tile = ImageCell::shared();
    let avatar = ImageCell::shared();
    loader.queue_game_thumbnail(3, tile.clone(), None, false);
    loader.queue_user_avatar(4, avatar.clone(), None, false);

    assert_eq!(tile.current_source(), "/img/placeholders/game.png");
    assert_eq!(avatar.current_source(), "/img/placeholders/avatar.png");

    settle().await;
    assert_eq!(tile.current_source(), "https://cdn/tile-3.png");
}

#[tokio::test(start_paused = true)]
async fn categories_drain_independently() {
    let fetcher = MockFetcher::new();
    let loader = loader_with(&fetcher, LoaderConfig::default());

    loader.queue_game_thumbnail(1, ImageCell::shared(), None, false);
    loader.queue_game_icon(1, ImageCell::shared(), None, false);
    loader.queue_user_avatar(1, ImageCell::shared(), None, false);
    settle().await;

    assert_eq!(fetcher.call_count(Category::GameThumbnail), 1);
    assert_eq!(fetcher.call_count(Category::GameIcon), 1);
    assert_eq!(fetcher.call_count(Category::UserAvatar), 1);
    assert_eq!(loader.pending_counts().total(), 0);
}
