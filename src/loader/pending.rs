//! Per-category pending request queues
//!
//! A pending queue coalesces every caller that wants the same image into a
//! single outbound request while preserving enqueue order for the drain.

use crate::slot::ImageSlot;
use std::collections::{HashMap, VecDeque};
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use xxhash_rust::xxh3::Xxh3;

/// Composite key for one distinct remote image
///
/// Two queue calls collapse into one request exactly when both the entity
/// id and the size string match.
pub(crate) fn request_key(entity_id: u64, size: &str) -> u64 {
    let mut hasher = Xxh3::new();
    entity_id.hash(&mut hasher);
    size.hash(&mut hasher);
    hasher.finish()
}

/// One distinct remote image and every element waiting on it
pub(crate) struct PendingRequest {
    pub entity_id: u64,
    pub size: String,
    pub slots: Vec<Arc<dyn ImageSlot>>,
}

/// Keyed, insertion-ordered collection of pending requests
///
/// At most one entry exists per `(entity_id, size)` pair; later callers for
/// the same pair append their slot to the existing entry.
#[derive(Default)]
pub(crate) struct PendingQueue {
    entries: HashMap<u64, PendingRequest>,
    order: VecDeque<u64>,
}

impl PendingQueue {
    /// Add a slot for `(entity_id, size)`; returns true when the call
    /// coalesced into an existing entry
    pub fn enqueue(&mut self, entity_id: u64, size: String, slot: Arc<dyn ImageSlot>) -> bool {
        let key = request_key(entity_id, &size);
        match self.entries.get_mut(&key) {
            Some(request) => {
                request.slots.push(slot);
                true
            }
            None => {
                self.entries.insert(
                    key,
                    PendingRequest {
                        entity_id,
                        size,
                        slots: vec![slot],
                    },
                );
                self.order.push_back(key);
                false
            }
        }
    }

    /// Take every pending request, in enqueue order, leaving the queue empty
    pub fn drain(&mut self) -> Vec<PendingRequest> {
        let drained = self
            .order
            .drain(..)
            .filter_map(|key| self.entries.remove(&key))
            .collect();
        debug_assert!(self.entries.is_empty());
        drained
    }

    /// Number of distinct pending requests
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Drop everything without draining
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}
