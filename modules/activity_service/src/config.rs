//! Configuration for activity service module

use serde::{Deserialize, Serialize};

/// Activity service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Where `created_at`/`updated_at` of transformed entities come from
    #[serde(default)]
    pub timestamp_policy: TimestampPolicy,

    /// Feedback page size used when the request does not name one
    #[serde(default = "default_feedback_page_size")]
    pub feedback_page_size: u64,

    /// Upper bound for requested feedback page sizes
    #[serde(default = "default_max_feedback_page_size")]
    pub max_feedback_page_size: u64,

    /// Lookup rows ensured at startup
    #[serde(default)]
    pub seed: SeedConfig,
}

/// Source of entity timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampPolicy {
    /// Stamp on the server: creation time once, update time on every change
    #[default]
    Server,
    /// Accept the client's timestamps, falling back to server values
    Client,
}

/// Technologies and activity types created when missing
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SeedConfig {
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub activity_types: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timestamp_policy: TimestampPolicy::default(),
            feedback_page_size: default_feedback_page_size(),
            max_feedback_page_size: default_max_feedback_page_size(),
            seed: SeedConfig::default(),
        }
    }
}

fn default_feedback_page_size() -> u64 {
    20
}

fn default_max_feedback_page_size() -> u64 {
    100
}
