//! Sweep Metrics
//!
//! Thread-safe counters describing what a sweep looked at and removed.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Thread-safe metrics for tracking sweeps
#[derive(Debug, Clone)]
pub struct SweepMetrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug, Default)]
struct MetricsInner {
    /// Number of sweeps started
    sweeps: AtomicUsize,
    /// Objects seen in listings
    objects_listed: AtomicUsize,
    /// Distinct deployments seen in listings
    deployments_seen: AtomicUsize,
    /// Deployments kept
    deployments_retained: AtomicUsize,
    /// Objects marked for deletion
    objects_planned: AtomicUsize,
    /// Objects deleted (or counted as deleted in dry-run)
    objects_deleted: AtomicUsize,
    /// Individual deletions that failed
    deletions_failed: AtomicUsize,
    /// Bytes held by objects marked for deletion
    bytes_reclaimable: AtomicU64,
    /// Total duration in milliseconds
    total_duration_ms: AtomicU64,
}

impl Default for SweepMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl SweepMetrics {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner::default()),
        }
    }

    pub fn record_sweep(&self) {
        self.inner.sweeps.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_listing(&self, objects: usize) {
        self.inner
            .objects_listed
            .fetch_add(objects, Ordering::Relaxed);
    }

    pub fn record_plan(&self, deployments: usize, retained: usize, planned: usize, bytes: u64) {
        self.inner
            .deployments_seen
            .fetch_add(deployments, Ordering::Relaxed);
        self.inner
            .deployments_retained
            .fetch_add(retained, Ordering::Relaxed);
        self.inner
            .objects_planned
            .fetch_add(planned, Ordering::Relaxed);
        self.inner
            .bytes_reclaimable
            .fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn record_deleted(&self, count: usize) {
        self.inner
            .objects_deleted
            .fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_failed(&self, count: usize) {
        self.inner
            .deletions_failed
            .fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_duration_ms(&self, duration_ms: u64) {
        self.inner
            .total_duration_ms
            .fetch_add(duration_ms, Ordering::Relaxed);
    }

    pub fn sweeps(&self) -> usize {
        self.inner.sweeps.load(Ordering::Relaxed)
    }

    pub fn objects_listed(&self) -> usize {
        self.inner.objects_listed.load(Ordering::Relaxed)
    }

    pub fn deployments_seen(&self) -> usize {
        self.inner.deployments_seen.load(Ordering::Relaxed)
    }

    pub fn deployments_retained(&self) -> usize {
        self.inner.deployments_retained.load(Ordering::Relaxed)
    }

    pub fn objects_planned(&self) -> usize {
        self.inner.objects_planned.load(Ordering::Relaxed)
    }

    pub fn objects_deleted(&self) -> usize {
        self.inner.objects_deleted.load(Ordering::Relaxed)
    }

    pub fn deletions_failed(&self) -> usize {
        self.inner.deletions_failed.load(Ordering::Relaxed)
    }

    pub fn bytes_reclaimable(&self) -> u64 {
        self.inner.bytes_reclaimable.load(Ordering::Relaxed)
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.inner.total_duration_ms.load(Ordering::Relaxed)
    }
}
