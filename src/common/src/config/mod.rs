use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

/// Default configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "deploysweep.toml";

/// Prefix for nested environment overrides, e.g. `DEPLOYSWEEP__RETENTION__KEEP`.
pub const ENV_PREFIX: &str = "DEPLOYSWEEP__";

/// Object store backend kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// S3 or an S3-compatible endpoint (LocalStack, MinIO).
    S3,
    /// Process-local in-memory store.
    Memory,
    /// Local directory.
    File,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::S3 => write!(f, "s3"),
            StorageBackend::Memory => write!(f, "memory"),
            StorageBackend::File => write!(f, "file"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend to list and delete objects in.
    ///
    /// Env: DEPLOYSWEEP__STORAGE__BACKEND
    pub backend: StorageBackend,
    /// Bucket holding the deployments.
    ///
    /// Env: S3_BUCKET or DEPLOYSWEEP__STORAGE__BUCKET
    pub bucket: String,
    /// Env: AWS_REGION or DEPLOYSWEEP__STORAGE__REGION
    pub region: String,
    /// Custom S3 endpoint. Empty means the default AWS endpoint resolution.
    ///
    /// Env: AWS_ENDPOINT or DEPLOYSWEEP__STORAGE__ENDPOINT
    pub endpoint: String,
    /// Root directory for the `file` backend.
    pub path: String,
    /// Only objects under this key prefix are considered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::S3,
            bucket: "sample-bucket".to_string(),
            region: "us-east-1".to_string(),
            endpoint: "http://localhost:4566".to_string(),
            path: ".data/deployments".to_string(),
            prefix: None,
        }
    }
}

impl StorageConfig {
    /// In-memory storage, used by tests and local experiments.
    pub fn in_memory() -> Self {
        Self {
            backend: StorageBackend::Memory,
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// Number of most recent deployments to keep. Zero means unset.
    ///
    /// Env: DEPLOYSWEEP__RETENTION__KEEP
    pub keep: i64,
    /// Separates the deployment prefix from the rest of an object key.
    ///
    /// Env: DEPLOYSWEEP__RETENTION__DELIMITER
    pub delimiter: char,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            keep: 0,
            delimiter: '/',
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Log the deletion plan without deleting anything.
    ///
    /// Env: DEPLOYSWEEP__SWEEP__DRY_RUN
    pub dry_run: bool,
    /// Maximum number of deletions per batch.
    pub batch_size: usize,
    /// Pause between deletion batches.
    #[serde(with = "humantime_serde")]
    pub batch_pause: Duration,
    /// Treat "nothing to delete" as a failure.
    pub fail_on_empty: bool,
    /// List the remaining objects after deleting.
    pub show_remaining: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            dry_run: true,
            batch_size: 1000,
            batch_pause: Duration::from_millis(100),
            fail_on_empty: false,
            show_remaining: true,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Configuration {
    /// Object storage configuration
    pub storage: StorageConfig,
    /// Retention decision inputs
    pub retention: RetentionConfig,
    /// Deletion execution
    pub sweep: SweepConfig,
}

impl Configuration {
    /// Layered configuration sources, later ones win:
    /// defaults, TOML file, legacy AWS variables, `DEPLOYSWEEP__` variables.
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Configuration::default()))
            .merge(Toml::file(path))
            .merge(legacy_env())
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load() -> Result<Self, Box<figment::Error>> {
        Self::load_from_path(Path::new(DEFAULT_CONFIG_FILE))
    }

    pub fn load_from_path(path: &Path) -> Result<Self, Box<figment::Error>> {
        Self::figment(path).extract().map_err(Box::new)
    }

    /// Check settings that would make a sweep fail halfway.
    ///
    /// The retention count is validated by the planner itself.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.storage.backend == StorageBackend::S3 && self.storage.bucket.is_empty() {
            anyhow::bail!("storage.bucket cannot be empty for the s3 backend");
        }

        if self.storage.backend == StorageBackend::File && self.storage.path.is_empty() {
            anyhow::bail!("storage.path cannot be empty for the file backend");
        }

        if self.sweep.batch_size == 0 {
            anyhow::bail!("sweep.batch_size must be positive, got 0");
        }

        Ok(())
    }
}

/// Unprefixed AWS-style variables accepted for the storage section.
fn legacy_env() -> Env {
    Env::raw()
        .only(&["AWS_REGION", "AWS_ENDPOINT", "S3_BUCKET"])
        .map(|key| {
            if key.as_str().eq_ignore_ascii_case("AWS_REGION") {
                "storage.region".into()
            } else if key.as_str().eq_ignore_ascii_case("AWS_ENDPOINT") {
                "storage.endpoint".into()
            } else {
                "storage.bucket".into()
            }
        })
}
