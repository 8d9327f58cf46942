//! Tokio async runtime implementation
//!
//! Provides integration with the Tokio async runtime.

use super::{AsyncSpawner, BoxFuture, JoinHandle};
use std::future::Future;
use std::time::Duration;

/// Tokio-based async spawner
///
/// Spawns tasks on the Tokio runtime. Sleeps route through tokio's timer,
/// so `tokio::time::pause` makes debounce windows deterministic in tests.
#[derive(Clone, Debug, Default, Copy)]
pub struct TokioSpawner;

impl TokioSpawner {
    /// Create a new Tokio spawner
    pub fn new() -> Self {
        Self
    }
}

impl AsyncSpawner for TokioSpawner {
    fn spawn<F>(&self, task: F) -> JoinHandle
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(task);
        JoinHandle::new(handle)
    }

    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(duration))
    }

    fn runtime_name(&self) -> &'static str {
        "Tokio"
    }

    fn block_on<F, T>(&self, future: F) -> Option<T>
    where
        F: Future<Output = T>,
    {
        // Try to get the current runtime handle
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            // If we're already in a tokio context, use block_in_place
            Some(tokio::task::block_in_place(|| handle.block_on(future)))
        } else {
            // Create a new runtime for blocking
            let rt = tokio::runtime::Runtime::new().ok()?;
            Some(rt.block_on(future))
        }
    }
}
