//! Process configuration
//!
//! Configuration comes from an optional TOML file, then environment
//! variables. The alert topic is read per invocation so that an unset
//! topic turns dispatch into a no-op.

use crate::error::{GuardError, Result};
use crate::policy::Policy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming the alert topic
pub const ALERT_TOPIC_ENV: &str = "SNS_TOPIC_ARN";

/// Environment variable naming the AWS region
pub const REGION_ENV: &str = "AWS_REGION";

/// Upload guard configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Alert destination; alerts are skipped when unset
    #[serde(default)]
    pub alert_topic: Option<String>,

    /// Region override for the alert transport
    #[serde(default)]
    pub region: Option<String>,

    /// Upload policy
    #[serde(default)]
    pub policy: Policy,
}

impl GuardConfig {
    /// Default configuration with environment overrides applied
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GuardError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply overrides from process environment variables
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    ///
    /// Empty values count as unset.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(topic) = lookup(ALERT_TOPIC_ENV) {
            self.alert_topic = Some(topic);
        }
        if let Some(region) = lookup(REGION_ENV) {
            self.region = Some(region);
        }
        self.alert_topic = self.alert_topic.filter(|topic| !topic.trim().is_empty());
        self
    }
}
