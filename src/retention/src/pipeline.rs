//! One-shot listing → deletion plan computation.

use crate::error::RetentionError;
use crate::grouper::Grouper;
use crate::object::{DEFAULT_DELIMITER, ObjectRecord};
use crate::planner::{DeletionPlan, DeletionPlanner};
use crate::selector::{RetentionCount, RetentionSet};
use serde::Serialize;

/// Inputs that shape a retention decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionSettings {
    /// Number of most recent deployments to keep. Must be positive.
    pub keep: i64,
    /// Separates the deployment prefix from the rest of a key.
    pub delimiter: char,
}

impl RetentionSettings {
    pub fn keep(keep: i64) -> Self {
        Self {
            keep,
            delimiter: DEFAULT_DELIMITER,
        }
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// How a computed plan should be reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum PlanOutcome {
    /// All deployments fit within the retention count.
    NothingToDelete,
    /// `objects` keys from `deployments` deployments are marked for deletion.
    Delete { objects: usize, deployments: usize },
}

/// Result of a single planning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepPlan {
    /// Number of distinct deployments in the listing.
    pub deployments: usize,
    /// Deployments that are kept, most recent first.
    pub retained: RetentionSet,
    /// Keys to delete and keys that survive.
    pub deletion: DeletionPlan,
}

impl SweepPlan {
    pub fn outcome(&self) -> PlanOutcome {
        if self.deletion.is_empty() {
            PlanOutcome::NothingToDelete
        } else {
            PlanOutcome::Delete {
                objects: self.deletion.len(),
                deployments: self.deployments - self.retained.len(),
            }
        }
    }
}

/// Runs grouping, selection and planning over a listing snapshot.
///
/// Holds no state between calls: each [`compute`](Self::compute) builds a
/// fresh plan from its input.
#[derive(Debug, Clone, Copy)]
pub struct RetentionPlanner {
    settings: RetentionSettings,
}

impl RetentionPlanner {
    pub fn new(settings: RetentionSettings) -> Self {
        Self { settings }
    }

    /// Compute the deletion plan for `objects`.
    ///
    /// # Errors
    ///
    /// Returns [`RetentionError::InvalidRetentionCount`] if `keep <= 0`. The
    /// check happens before the listing is touched.
    pub fn compute(&self, objects: &[ObjectRecord]) -> Result<SweepPlan, RetentionError> {
        let count = RetentionCount::new(self.settings.keep)?;

        let groups = Grouper::new(self.settings.delimiter).group(objects);
        let retained = RetentionSet::rank(&groups, count);
        let deletion =
            DeletionPlanner::new(self.settings.delimiter).plan(objects, &retained.prefixes());

        Ok(SweepPlan {
            deployments: groups.len(),
            retained,
            deletion,
        })
    }
}
