use common::config::Configuration;
use retention::RetentionSettings;
use std::time::Duration;

/// Settings for a single sweep, resolved from [`Configuration`] and CLI flags.
#[derive(Debug, Clone)]
pub struct SweeperConfig {
    pub retention: RetentionSettings,
    /// Only objects under this key prefix are listed.
    pub prefix: Option<String>,
    pub dry_run: bool,
    pub batch_size: usize,
    pub batch_pause: Duration,
    pub fail_on_empty: bool,
    pub show_remaining: bool,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self::from(&Configuration::default())
    }
}

impl From<&Configuration> for SweeperConfig {
    fn from(config: &Configuration) -> Self {
        Self {
            retention: RetentionSettings::keep(config.retention.keep)
                .with_delimiter(config.retention.delimiter),
            prefix: config.storage.prefix.clone(),
            dry_run: config.sweep.dry_run,
            batch_size: config.sweep.batch_size,
            batch_pause: config.sweep.batch_pause,
            fail_on_empty: config.sweep.fail_on_empty,
            show_remaining: config.sweep.show_remaining,
        }
    }
}

/// Batch deletion settings.
#[derive(Debug, Clone)]
pub struct CleanerConfig {
    pub dry_run: bool,
    pub batch_size: usize,
    pub batch_pause: Duration,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self::from(&SweeperConfig::default())
    }
}

impl From<&SweeperConfig> for CleanerConfig {
    fn from(config: &SweeperConfig) -> Self {
        Self {
            dry_run: config.dry_run,
            batch_size: config.batch_size,
            batch_pause: config.batch_pause,
        }
    }
}
