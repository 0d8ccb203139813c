//! The pending-resource queue of one resolve call.

use std::collections::BTreeMap;

use crate::content::{ResolvableResource, ResourceId};

/// Placeholders of one depth, keyed by id.
pub type DepthEntries = BTreeMap<ResourceId, ResolvableResource>;

/// All placeholders of one priority level: loader key -> depth -> id.
pub type PriorityBucket = BTreeMap<String, BTreeMap<usize, DepthEntries>>;

/// Placeholders waiting to be loaded, keyed `priority -> loader key -> depth -> id`.
///
/// Priorities are kept sorted, so the highest level is always popped next
/// without re-sorting after a merge. Inserting the same
/// `(priority, loader key, depth, id)` again replaces the earlier entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingResources {
    buckets: BTreeMap<i32, PriorityBucket>,
}

impl PendingResources {
    pub fn new() -> Self {
        Self::default()
    }

    /// File `resource` at `depth`.
    pub fn insert(&mut self, depth: usize, resource: ResolvableResource) {
        tracing::trace!(
            "Queued {} {} at depth {} (priority {})",
            resource.resource_loader_key(),
            resource.id(),
            depth,
            resource.priority()
        );
        self.buckets
            .entry(resource.priority())
            .or_default()
            .entry(resource.resource_loader_key().to_string())
            .or_default()
            .entry(depth)
            .or_default()
            .insert(resource.id().clone(), resource);
    }

    /// Merge every entry of `other` into this queue.
    pub fn merge(&mut self, other: Self) {
        for (priority, bucket) in other.buckets {
            let target = self.buckets.entry(priority).or_default();
            for (key, depths) in bucket {
                let target = target.entry(key).or_default();
                for (depth, entries) in depths {
                    target.entry(depth).or_default().extend(entries);
                }
            }
        }
    }

    /// Remove and return the highest priority level.
    pub fn pop_highest(&mut self) -> Option<(i32, PriorityBucket)> {
        self.buckets.pop_last()
    }

    /// Priorities currently queued, highest first.
    pub fn priorities(&self) -> Vec<i32> {
        self.buckets.keys().rev().copied().collect()
    }

    /// Number of queued entries across all levels.
    pub fn len(&self) -> usize {
        self.buckets
            .values()
            .flat_map(BTreeMap::values)
            .flat_map(BTreeMap::values)
            .map(BTreeMap::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
