//! Grouping of objects into deployments.

use crate::object::{DEFAULT_DELIMITER, ObjectRecord};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Deployment prefix → newest `last_modified` among its objects.
pub type RecencyMap = HashMap<String, DateTime<Utc>>;

/// Partitions a listing into deployment groups by key prefix.
#[derive(Debug, Clone, Copy)]
pub struct Grouper {
    delimiter: char,
}

impl Default for Grouper {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

impl Grouper {
    pub fn new(delimiter: char) -> Self {
        Self { delimiter }
    }

    /// Build one entry per distinct prefix holding the group's recency.
    ///
    /// Duplicate keys are separate observations; the maximum wins regardless
    /// of input order.
    pub fn group(&self, objects: &[ObjectRecord]) -> RecencyMap {
        let mut groups = RecencyMap::new();

        for object in objects {
            match groups.entry(object.prefix(self.delimiter).to_string()) {
                Entry::Vacant(slot) => {
                    slot.insert(object.last_modified);
                }
                Entry::Occupied(mut slot) => {
                    if object.last_modified > *slot.get() {
                        slot.insert(object.last_modified);
                    }
                }
            }
        }

        tracing::debug!(
            objects = objects.len(),
            deployments = groups.len(),
            "Grouped objects into deployments"
        );

        groups
    }
}
