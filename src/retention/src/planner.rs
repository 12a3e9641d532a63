//! Partitioning of a listing into retained keys and keys to delete.

use crate::object::{DEFAULT_DELIMITER, ObjectRecord};
use serde::Serialize;
use std::collections::HashSet;

/// Keys to delete, together with the keys that survive.
///
/// Both lists preserve the input order and key text verbatim. Every input
/// record lands in exactly one of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeletionPlan {
    /// Keys of objects outside the retained deployments.
    pub keys: Vec<String>,
    /// Keys of objects inside the retained deployments.
    pub retained_keys: Vec<String>,
    /// Sum of `size_bytes` over the objects to delete.
    pub reclaimable_bytes: u64,
}

impl DeletionPlan {
    /// Nothing to delete: every deployment fits within the retention count.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }
}

/// Computes the deletion plan for a listing and a set of retained prefixes.
#[derive(Debug, Clone, Copy)]
pub struct DeletionPlanner {
    delimiter: char,
}

impl Default for DeletionPlanner {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

impl DeletionPlanner {
    /// The delimiter must match the one used for grouping.
    pub fn new(delimiter: char) -> Self {
        Self { delimiter }
    }

    /// Mark every object whose prefix is not retained for deletion.
    ///
    /// Prefixes in `retained` that do not occur in `objects` are ignored.
    pub fn plan(&self, objects: &[ObjectRecord], retained: &HashSet<String>) -> DeletionPlan {
        let mut plan = DeletionPlan::default();

        for object in objects {
            if retained.contains(object.prefix(self.delimiter)) {
                plan.retained_keys.push(object.key.clone());
            } else {
                plan.keys.push(object.key.clone());
                plan.reclaimable_bytes += object.size_bytes;
            }
        }

        debug_assert_eq!(
            plan.keys.len() + plan.retained_keys.len(),
            objects.len(),
            "every object must be either retained or deleted"
        );

        tracing::debug!(
            objects = objects.len(),
            to_delete = plan.keys.len(),
            retained = plan.retained_keys.len(),
            reclaimable_bytes = plan.reclaimable_bytes,
            "Computed deletion plan"
        );

        plan
    }
}
