//! Recency ranking and top-K selection of deployments.

use crate::error::RetentionError;
use crate::grouper::RecencyMap;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::num::NonZeroUsize;

/// Validated number of deployments to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RetentionCount(NonZeroUsize);

impl RetentionCount {
    /// Validate a raw retention count.
    ///
    /// # Errors
    ///
    /// Returns [`RetentionError::InvalidRetentionCount`] if `count <= 0`.
    pub fn new(count: i64) -> Result<Self, RetentionError> {
        if count <= 0 {
            return Err(RetentionError::InvalidRetentionCount { count });
        }

        // Counts beyond the address space keep everything anyway.
        let count = usize::try_from(count).unwrap_or(usize::MAX);
        NonZeroUsize::new(count)
            .map(Self)
            .ok_or(RetentionError::InvalidRetentionCount { count: 0 })
    }

    pub fn get(&self) -> usize {
        self.0.get()
    }
}

impl TryFrom<i64> for RetentionCount {
    type Error = RetentionError;

    fn try_from(count: i64) -> Result<Self, Self::Error> {
        Self::new(count)
    }
}

impl fmt::Display for RetentionCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A deployment prefix and the newest modification time of its objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentGroup {
    pub prefix: String,
    pub recency: DateTime<Utc>,
}

impl DeploymentGroup {
    /// Ranking order: most recent first, prefix ascending on equal recency.
    fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .recency
            .cmp(&self.recency)
            .then_with(|| self.prefix.cmp(&other.prefix))
    }
}

/// The retained deployments, most recent first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetentionSet {
    groups: Vec<DeploymentGroup>,
}

impl RetentionSet {
    /// Rank all groups and keep the first `min(count, groups.len())`.
    pub fn rank(groups: &RecencyMap, count: RetentionCount) -> Self {
        let mut ranked: Vec<DeploymentGroup> = groups
            .iter()
            .map(|(prefix, recency)| DeploymentGroup {
                prefix: prefix.clone(),
                recency: *recency,
            })
            .collect();

        ranked.sort_by(DeploymentGroup::rank_cmp);
        ranked.truncate(count.get());

        tracing::debug!(
            deployments = groups.len(),
            retained = ranked.len(),
            keep = count.get(),
            "Selected most recent deployments"
        );

        Self { groups: ranked }
    }

    /// Retained deployments in ranking order.
    pub fn groups(&self) -> &[DeploymentGroup] {
        &self.groups
    }

    /// Retained prefixes; order is not significant.
    pub fn prefixes(&self) -> HashSet<String> {
        self.groups.iter().map(|g| g.prefix.clone()).collect()
    }

    pub fn contains(&self, prefix: &str) -> bool {
        self.groups.iter().any(|g| g.prefix == prefix)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Keep the `k` most recent deployments.
///
/// `k` is validated before any ordering work is done.
///
/// # Errors
///
/// Returns [`RetentionError::InvalidRetentionCount`] if `k <= 0`.
pub fn select(groups: &RecencyMap, k: i64) -> Result<RetentionSet, RetentionError> {
    let count = RetentionCount::new(k)?;
    Ok(RetentionSet::rank(groups, count))
}
