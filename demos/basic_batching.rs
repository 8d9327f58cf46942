//! Batching walkthrough
//!
//! Queues a screenful of game icons against a mock host and shows the
//! burst collapsing into capped, sequential batch calls.

use std::time::Duration;

use thumbflow::{
    Category, ImageCell, ImageSlot, LoaderConfig, MockFetcher, ThumbnailLoader, TokioSpawner,
};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();

    println!("thumbflow Batching Demo");
    println!("=======================\n");

    let fetcher = MockFetcher::new();
    for id in 1..=8u64 {
        fetcher.seed_url(Category::GameIcon, id, format!("https://cdn/icons/{id}.png"));
    }

    let loader = ThumbnailLoader::new(
        fetcher.clone(),
        TokioSpawner::new(),
        LoaderConfig {
            max_batch_size: 3,
            lazy_loading: false,
            ..LoaderConfig::default()
        },
    );

    let tiles: Vec<_> = (0..8).map(|_| ImageCell::shared()).collect();
    for (index, tile) in tiles.iter().enumerate() {
        loader.queue_game_icon(index as u64 + 1, tile.clone(), None, false);
    }
    // A couple of duplicate bindings, e.g. the same game shown twice
    loader.queue_game_icon(1, ImageCell::shared(), None, false);
    loader.queue_game_icon(2, ImageCell::shared(), None, false);

    println!("Queued 10 bindings for 8 distinct icons");
    println!("Pending after the burst: {:?}", loader.pending_counts());
    println!("Tile 1 while waiting: {}", tiles[0].current_source());

    // Let the debounce window elapse and the batch land
    tokio::time::sleep(Duration::from_millis(60)).await;

    println!("\nResolved sources:");
    for (index, tile) in tiles.iter().enumerate() {
        println!("  tile {} -> {}", index + 1, tile.current_source());
    }

    println!("\nHost calls made: {} (cap was 3 ids per call)", fetcher.total_calls());
    for call in fetcher.calls() {
        println!("  {} ids={:?} size={}", call.category, call.ids, call.size);
    }

    let metrics = loader.metrics();
    println!(
        "\nBatches fired: {}, coalesced queue calls: {}, slots resolved: {}",
        metrics.batches_fired(),
        metrics.coalesced_requests(),
        metrics.resolved_slots()
    );
}
