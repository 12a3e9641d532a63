//! Deployment retention planning.
//!
//! Decides which deployment groups stored under shared key prefixes are recent
//! enough to keep and produces the exact list of object keys to remove.
//!
//! ## Pipeline
//!
//! 1. **Grouper**: partition a flat listing into deployment groups keyed by
//!    prefix, each carrying the newest `last_modified` of its objects
//! 2. **Selector**: rank groups by recency (prefix ascending on ties) and keep
//!    the top `K`
//! 3. **DeletionPlanner**: split the listing into retained keys and keys to
//!    delete
//!
//! Everything here works on an in-memory snapshot. Listing and deleting
//! objects is the caller's job.
//!
//! ## Usage
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use retention::{ObjectRecord, PlanOutcome, RetentionPlanner, RetentionSettings};
//!
//! let at = |secs| Utc.timestamp_opt(secs, 0).unwrap();
//! let objects = vec![
//!     ObjectRecord::new("a/1", at(1)),
//!     ObjectRecord::new("a/2", at(3)),
//!     ObjectRecord::new("b/1", at(2)),
//!     ObjectRecord::new("c/1", at(5)),
//! ];
//!
//! let planner = RetentionPlanner::new(RetentionSettings::keep(2));
//! let plan = planner.compute(&objects)?;
//!
//! assert_eq!(plan.deletion.keys, vec!["b/1".to_string()]);
//! assert_eq!(plan.outcome(), PlanOutcome::Delete { objects: 1, deployments: 1 });
//! # Ok::<(), retention::RetentionError>(())
//! ```

pub mod error;
pub mod grouper;
pub mod object;
pub mod pipeline;
pub mod planner;
pub mod selector;

pub use error::RetentionError;
pub use grouper::{Grouper, RecencyMap};
pub use object::{DEFAULT_DELIMITER, ObjectRecord, prefix_id};
pub use pipeline::{PlanOutcome, RetentionPlanner, RetentionSettings, SweepPlan};
pub use planner::{DeletionPlan, DeletionPlanner};
pub use selector::{DeploymentGroup, RetentionCount, RetentionSet, select};
