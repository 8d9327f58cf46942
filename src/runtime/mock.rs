//! Mock async spawner for testing
//!
//! Provides a mock async spawner that can run tasks synchronously
//! or drop them entirely for testing purposes.

use super::{AsyncSpawner, BoxFuture, JoinHandle};
use std::future::Future;
use std::time::Duration;

/// Spawn behavior for MockSpawner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockSpawnBehavior {
    /// Drop tasks immediately (don't execute)
    Drop,
    /// Block on tasks synchronously using a simple executor
    BlockSync,
}

/// Mock async spawner for testing
///
/// This spawner can either drop tasks immediately or run them synchronously.
/// Its [`sleep`](AsyncSpawner::sleep) completes at once, so in `BlockSync`
/// mode a loader's debounce window collapses and every queue call drains on
/// the spot; in `Drop` mode armed timers never fire, which keeps pending
/// queues inspectable.
#[derive(Clone, Debug)]
pub struct MockSpawner {
    behavior: MockSpawnBehavior,
}

impl Default for MockSpawner {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSpawner {
    /// Create a new mock spawner that drops tasks
    pub fn new() -> Self {
        Self {
            behavior: MockSpawnBehavior::Drop,
        }
    }

    /// Create a mock spawner with specific behavior
    pub fn with_behavior(behavior: MockSpawnBehavior) -> Self {
        Self { behavior }
    }

    /// Create a mock spawner that runs tasks synchronously
    pub fn blocking() -> Self {
        Self {
            behavior: MockSpawnBehavior::BlockSync,
        }
    }
}

impl AsyncSpawner for MockSpawner {
    fn spawn<F>(&self, task: F) -> JoinHandle
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match self.behavior {
            MockSpawnBehavior::Drop => {
                // Just drop the task
                drop(task);
                JoinHandle::new(())
            }
            MockSpawnBehavior::BlockSync => {
                // Run synchronously using a simple block_on
                futures::executor::block_on(task);
                JoinHandle::new(())
            }
        }
    }

    fn sleep(&self, _duration: Duration) -> BoxFuture<'static, ()> {
        // Time does not pass in the mock
        Box::pin(std::future::ready(()))
    }

    fn runtime_name(&self) -> &'static str {
        "Mock"
    }

    fn block_on<F, T>(&self, future: F) -> Option<T>
    where
        F: Future<Output = T>,
    {
        match self.behavior {
            MockSpawnBehavior::Drop => None,
            MockSpawnBehavior::BlockSync => Some(futures::executor::block_on(future)),
        }
    }
}
