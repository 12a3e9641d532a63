//! Sweep orchestration: list, plan, report, delete.

use crate::cleaner::{DeletionResult, DeploymentCleaner};
use crate::config::{CleanerConfig, SweeperConfig};
use crate::error::SweepError;
use crate::lister::ObjectLister;
use crate::metrics::SweepMetrics;
use object_store::ObjectStore;
use retention::{ObjectRecord, PlanOutcome, RetentionCount, RetentionPlanner, SweepPlan};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// What a sweep found and did.
#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    /// Number of objects in the listing.
    pub objects: usize,
    /// The retention decision.
    pub plan: SweepPlan,
    /// Present when the plan was executed (including dry-run).
    pub deletion: Option<DeletionResult>,
    /// Keys left after deletion, if requested and something was deleted.
    pub remaining: Option<Vec<String>>,
}

impl SweepReport {
    pub fn outcome(&self) -> PlanOutcome {
        self.plan.outcome()
    }
}

/// Runs one retention sweep over a store.
pub struct Sweeper {
    config: SweeperConfig,
    object_store: Arc<dyn ObjectStore>,
    metrics: SweepMetrics,
}

impl Sweeper {
    pub fn new(config: SweeperConfig, object_store: Arc<dyn ObjectStore>) -> Self {
        Self {
            config,
            object_store,
            metrics: SweepMetrics::new(),
        }
    }

    pub fn metrics(&self) -> &SweepMetrics {
        &self.metrics
    }

    fn lister(&self) -> ObjectLister {
        ObjectLister::new(self.object_store.clone()).with_prefix(self.config.prefix.as_deref())
    }

    /// Compute the deletion plan without touching the store beyond listing.
    ///
    /// # Errors
    ///
    /// The retention count is checked before the store is listed.
    pub async fn plan(&self) -> Result<(usize, SweepPlan), SweepError> {
        RetentionCount::new(self.config.retention.keep)?;

        let objects = self.lister().list_objects().await?;
        self.metrics.record_listing(objects.len());

        let plan = RetentionPlanner::new(self.config.retention).compute(&objects)?;
        self.metrics.record_plan(
            plan.deployments,
            plan.retained.len(),
            plan.deletion.len(),
            plan.deletion.reclaimable_bytes,
        );

        for group in plan.retained.groups() {
            tracing::info!(
                prefix = %group.prefix,
                recency = %group.recency,
                "Keeping deployment"
            );
        }

        Ok((objects.len(), plan))
    }

    /// Run a full sweep.
    ///
    /// An empty deletion plan is reported as [`PlanOutcome::NothingToDelete`]
    /// unless `fail_on_empty` is set.
    pub async fn run(&self) -> Result<SweepReport, SweepError> {
        let started = Instant::now();
        self.metrics.record_sweep();

        let (objects, plan) = self.plan().await?;

        let report = match plan.outcome() {
            PlanOutcome::NothingToDelete => {
                tracing::info!(
                    deployments = plan.deployments,
                    keep = self.config.retention.keep,
                    "No objects to delete"
                );

                if self.config.fail_on_empty {
                    return Err(SweepError::NothingToDelete {
                        deployments: plan.deployments,
                    });
                }

                SweepReport {
                    objects,
                    plan,
                    deletion: None,
                    remaining: None,
                }
            }
            PlanOutcome::Delete {
                objects: to_delete,
                deployments,
            } => {
                tracing::info!(
                    objects = to_delete,
                    deployments,
                    reclaimable_bytes = plan.deletion.reclaimable_bytes,
                    dry_run = self.config.dry_run,
                    "Found objects to delete"
                );

                let cleaner = DeploymentCleaner::new(
                    CleanerConfig::from(&self.config),
                    self.object_store.clone(),
                )
                .with_prefix(self.config.prefix.as_deref())
                .with_metrics(self.metrics.clone());
                let deletion = cleaner.execute(&plan.deletion).await;

                let remaining = if self.config.show_remaining && !self.config.dry_run {
                    remaining_keys(self.lister().list_objects().await)
                } else {
                    None
                };

                SweepReport {
                    objects,
                    plan,
                    deletion: Some(deletion),
                    remaining,
                }
            }
        };

        self.metrics
            .record_duration_ms(started.elapsed().as_millis() as u64);

        Ok(report)
    }
}

/// Sorted keys left after deletion.
///
/// Deletions have already happened at this point, so a failed listing only
/// drops this part of the report.
fn remaining_keys(listing: Result<Vec<ObjectRecord>, SweepError>) -> Option<Vec<String>> {
    match listing {
        Ok(objects) => {
            let mut keys: Vec<String> = objects.into_iter().map(|o| o.key).collect();
            keys.sort();
            Some(keys)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to list remaining objects");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeder::Seeder;
    use object_store::memory::InMemory;
    use retention::{RetentionError, RetentionSettings};
    use std::time::Duration;

    fn config(keep: i64, dry_run: bool) -> SweeperConfig {
        SweeperConfig {
            retention: RetentionSettings::keep(keep),
            dry_run,
            batch_pause: Duration::ZERO,
            ..Default::default()
        }
    }

    /// Three deployments written oldest first.
    async fn seeded_store() -> Arc<dyn ObjectStore> {
        let store: Arc<dyn ObjectStore> = Arc::new(InMemory::new());
        let seeder = Seeder::new(store.clone());
        for prefix in ["old", "mid", "new"] {
            seeder.seed(&[prefix], &["/index.html", "/app.js"]).await.unwrap();
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        store
    }

    #[tokio::test]
    async fn test_invalid_count_fails_before_listing() {
        let sweeper = Sweeper::new(config(0, true), seeded_store().await);

        let err = sweeper.run().await.unwrap_err();

        assert!(matches!(
            err,
            SweepError::Retention(RetentionError::InvalidRetentionCount { count: 0 })
        ));
        assert_eq!(sweeper.metrics().objects_listed(), 0);
    }

    #[tokio::test]
    async fn test_dry_run_reports_without_deleting() {
        let store = seeded_store().await;
        let sweeper = Sweeper::new(config(2, true), store.clone());

        let report = sweeper.run().await.unwrap();

        assert_eq!(report.objects, 6);
        assert_eq!(
            report.outcome(),
            PlanOutcome::Delete {
                objects: 2,
                deployments: 1
            }
        );
        assert_eq!(report.plan.retained.prefixes().len(), 2);
        assert!(report.plan.retained.contains("new"));
        assert!(report.plan.retained.contains("mid"));
        assert!(report.deletion.as_ref().unwrap().dry_run);
        assert!(report.remaining.is_none());

        let listed = ObjectLister::new(store).list_objects().await.unwrap();
        assert_eq!(listed.len(), 6);
    }

    #[tokio::test]
    async fn test_execute_deletes_expired_deployments() {
        let store = seeded_store().await;
        let sweeper = Sweeper::new(config(1, false), store.clone());

        let report = sweeper.run().await.unwrap();

        let deletion = report.deletion.unwrap();
        assert_eq!(deletion.deleted_count, 4);
        assert_eq!(deletion.failed_count, 0);
        assert_eq!(
            report.remaining.unwrap(),
            vec!["new/app.js".to_string(), "new/index.html".to_string()]
        );
        assert_eq!(sweeper.metrics().objects_deleted(), 4);
        assert_eq!(sweeper.metrics().deployments_seen(), 3);
        assert_eq!(sweeper.metrics().deployments_retained(), 1);
    }

    #[tokio::test]
    async fn test_nothing_to_delete_is_not_an_error() {
        let sweeper = Sweeper::new(config(3, false), seeded_store().await);

        let report = sweeper.run().await.unwrap();

        assert_eq!(report.outcome(), PlanOutcome::NothingToDelete);
        assert!(report.deletion.is_none());
    }

    #[tokio::test]
    async fn test_fail_on_empty() {
        let sweeper = Sweeper::new(
            SweeperConfig {
                fail_on_empty: true,
                ..config(5, false)
            },
            seeded_store().await,
        );

        let err = sweeper.run().await.unwrap_err();

        assert!(matches!(err, SweepError::NothingToDelete { deployments: 3 }));
    }

    #[test]
    fn test_remaining_keys_sorted() {
        let now = chrono::Utc::now();
        let listing = Ok(vec![
            ObjectRecord::new("new/index.html", now),
            ObjectRecord::new("new/app.js", now),
        ]);

        assert_eq!(
            remaining_keys(listing).unwrap(),
            vec!["new/app.js".to_string(), "new/index.html".to_string()]
        );
    }

    #[test]
    fn test_failed_remaining_listing_keeps_report() {
        let listing = Err(SweepError::List {
            prefix: String::new(),
            source: object_store::Error::Generic {
                store: "test",
                source: "connection reset".into(),
            },
        });

        assert!(remaining_keys(listing).is_none());
    }

    #[tokio::test]
    async fn test_empty_bucket() {
        let sweeper = Sweeper::new(config(1, false), Arc::new(InMemory::new()));

        let report = sweeper.run().await.unwrap();

        assert_eq!(report.objects, 0);
        assert_eq!(report.outcome(), PlanOutcome::NothingToDelete);
    }
}
