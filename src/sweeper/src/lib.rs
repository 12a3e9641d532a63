//! Object store side of deployment retention.
//!
//! Lists a bucket into a metadata snapshot, hands it to the
//! [`retention`] planner and executes the resulting deletion plan.

pub mod cleaner;
pub mod config;
pub mod error;
pub mod lister;
pub mod metrics;
pub mod seeder;
pub mod sweep;

pub use cleaner::{DeletionResult, DeploymentCleaner};
pub use config::{CleanerConfig, SweeperConfig};
pub use error::SweepError;
pub use lister::ObjectLister;
pub use metrics::SweepMetrics;
pub use seeder::{DEFAULT_SAMPLE_PREFIXES, DEFAULT_SAMPLE_SUFFIXES, Seeder};
pub use sweep::{SweepReport, Sweeper};
