use thiserror::Error;

/// Errors raised while computing a retention plan.
///
/// An empty deletion plan is not an error; see
/// [`PlanOutcome::NothingToDelete`](crate::PlanOutcome::NothingToDelete).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RetentionError {
    /// The number of deployments to keep must be positive.
    #[error("Invalid retention count: {count} (number of deployments to keep must be at least 1)")]
    InvalidRetentionCount { count: i64 },
}
