//! Lazy-loading walkthrough
//!
//! Simulates a grid of avatars where only the top rows start visible:
//! parked elements fetch nothing until they scroll in (or everything is
//! force-flushed).

use std::sync::Arc;
use std::time::Duration;

use thumbflow::{
    Category, ImageCell, ImageSlot, LoaderConfig, ManualViewport, MockFetcher, ThumbnailLoader,
    TokioSpawner,
};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();

    println!("thumbflow Lazy Grid Demo");
    println!("========================\n");

    let fetcher = MockFetcher::new();
    for id in 1..=6u64 {
        fetcher.seed_url(Category::UserAvatar, id, format!("https://cdn/avatars/{id}.png"));
    }
    let viewport = ManualViewport::new();

    let loader = ThumbnailLoader::with_viewport(
        fetcher.clone(),
        TokioSpawner::new(),
        LoaderConfig::default(),
        Arc::new(viewport.clone()),
    );

    let cells: Vec<_> = (0..6).map(|_| ImageCell::shared()).collect();
    for (index, cell) in cells.iter().enumerate() {
        loader.queue_user_avatar(index as u64 + 1, cell.clone(), None, false);
    }

    println!("Queued 6 avatars, all offscreen:");
    println!("  parked: {}, pending: {}", loader.lazy_count(), loader.pending_counts().total());
    println!("  host calls so far: {}", fetcher.total_calls());

    // The first row scrolls into view
    println!("\nScrolling the first two avatars into view...");
    viewport.trigger(cells[0].slot_id());
    viewport.trigger(cells[1].slot_id());
    tokio::time::sleep(Duration::from_millis(60)).await;

    for (index, cell) in cells.iter().enumerate() {
        println!("  avatar {} -> {}", index + 1, cell.current_source());
    }
    println!("  host calls: {}", fetcher.total_calls());

    // Force-load the rest, e.g. ahead of printing the page
    println!("\nForce-flushing the remaining parked avatars...");
    loader.load_all_lazy();
    tokio::time::sleep(Duration::from_millis(60)).await;

    for (index, cell) in cells.iter().enumerate() {
        println!("  avatar {} -> {}", index + 1, cell.current_source());
    }
    println!("  host calls: {}", fetcher.total_calls());

    loader.destroy();
    println!("\nLoader destroyed, observer disconnected.");
}
