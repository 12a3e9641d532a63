use retention::RetentionError;
use thiserror::Error;

/// Errors that abort a sweep.
///
/// Failures to delete individual objects are not errors; they are collected
/// in [`DeletionResult`](crate::cleaner::DeletionResult).
#[derive(Error, Debug)]
pub enum SweepError {
    /// The retention decision could not be computed.
    #[error(transparent)]
    Retention(#[from] RetentionError),

    /// Listing the bucket failed.
    #[error("Failed to list objects under '{prefix}': {source}")]
    List {
        prefix: String,
        #[source]
        source: object_store::Error,
    },

    /// Creating a sample object failed.
    #[error("Failed to create object '{key}': {source}")]
    Seed {
        key: String,
        #[source]
        source: object_store::Error,
    },

    /// Every deployment fits within the retention count and the caller asked
    /// for that to be treated as a failure.
    #[error("No objects to delete: {deployments} deployment(s) fit within the retention count")]
    NothingToDelete { deployments: usize },
}
