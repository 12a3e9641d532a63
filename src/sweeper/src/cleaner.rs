//! Deletion plan execution with batch processing.
//!
//! - Configurable batch sizes
//! - Dry-run mode that only logs
//! - Pause between batches

use crate::config::CleanerConfig;
use crate::lister::full_path;
use crate::metrics::SweepMetrics;
use object_store::ObjectStore;
use object_store::path::Path as ObjectPath;
use retention::DeletionPlan;
use serde::Serialize;
use std::sync::Arc;

/// Result of executing a deletion plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeletionResult {
    /// Objects deleted, or that would have been in dry-run mode.
    pub deleted_count: usize,
    /// Objects that failed to delete.
    pub failed_count: usize,
    /// Keys that failed to delete with error messages.
    pub failed_deletions: Vec<(String, String)>,
    /// Whether anything was actually removed.
    pub dry_run: bool,
}

/// Removes the objects of expired deployments.
pub struct DeploymentCleaner {
    config: CleanerConfig,
    object_store: Arc<dyn ObjectStore>,
    prefix: Option<ObjectPath>,
    metrics: SweepMetrics,
}

impl DeploymentCleaner {
    pub fn new(config: CleanerConfig, object_store: Arc<dyn ObjectStore>) -> Self {
        Self {
            config,
            object_store,
            prefix: None,
            metrics: SweepMetrics::new(),
        }
    }

    /// Keys in the plan are relative to `prefix`.
    pub fn with_prefix(mut self, prefix: Option<&str>) -> Self {
        self.prefix = prefix.map(ObjectPath::from);
        self
    }

    pub fn with_metrics(mut self, metrics: SweepMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Delete every key in the plan in batches.
    ///
    /// Individual failures are collected in the result and do not stop the
    /// remaining deletions.
    pub async fn execute(&self, plan: &DeletionPlan) -> DeletionResult {
        let mut result = DeletionResult {
            dry_run: self.config.dry_run,
            ..Default::default()
        };

        if plan.is_empty() {
            tracing::info!("No objects to delete");
            return result;
        }

        let batch_size = self.config.batch_size.max(1);
        let total_batches = plan.keys.len().div_ceil(batch_size);

        tracing::info!(
            objects = plan.keys.len(),
            dry_run = self.config.dry_run,
            batch_size,
            "Starting batch deletion"
        );

        for (batch_idx, batch) in plan.keys.chunks(batch_size).enumerate() {
            tracing::debug!(
                batch = batch_idx + 1,
                total_batches,
                batch_size = batch.len(),
                dry_run = self.config.dry_run,
                "Processing deletion batch"
            );

            for key in batch {
                if self.config.dry_run {
                    tracing::info!(key = %key, "[DRY-RUN] Would delete object");
                    result.deleted_count += 1;
                    continue;
                }

                match self.delete_object(key).await {
                    Ok(()) => {
                        tracing::info!(key = %key, "Deleted object");
                        result.deleted_count += 1;
                    }
                    Err(e) => {
                        tracing::error!(key = %key, error = %e, "Failed to delete object");
                        result.failed_deletions.push((key.clone(), e.to_string()));
                    }
                }
            }

            if batch_idx + 1 < total_batches && !self.config.batch_pause.is_zero() {
                tokio::time::sleep(self.config.batch_pause).await;
            }
        }

        result.failed_count = result.failed_deletions.len();
        self.metrics.record_deleted(result.deleted_count);
        self.metrics.record_failed(result.failed_count);

        tracing::info!(
            deleted = result.deleted_count,
            failed = result.failed_count,
            dry_run = self.config.dry_run,
            "Batch deletion complete"
        );

        result
    }

    async fn delete_object(&self, key: &str) -> object_store::Result<()> {
        let location = full_path(key, self.prefix.as_ref());
        match self.object_store.delete(&location).await {
            Ok(()) | Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }
}
