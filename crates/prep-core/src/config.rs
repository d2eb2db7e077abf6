//! Application configuration model.

use crate::error::{PrepError, Result};
use crate::question::{CategoryMix, DEFAULT_QUESTION_COUNT, PlanRequest};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_RESEARCH_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SCORING_TIMEOUT_SECS: u64 = 60;

/// Root configuration (`config.toml`).
///
/// Every field has a default, so a missing or partial file is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrepConfig {
    /// Directory holding session records. Defaults to the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub planning: PlanningConfig,
}

/// Upper bounds on collaborator calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutConfig {
    #[serde(default = "default_research_secs")]
    pub research_secs: u64,
    #[serde(default = "default_scoring_secs")]
    pub scoring_secs: u64,
}

fn default_research_secs() -> u64 {
    DEFAULT_RESEARCH_TIMEOUT_SECS
}

fn default_scoring_secs() -> u64 {
    DEFAULT_SCORING_TIMEOUT_SECS
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            research_secs: DEFAULT_RESEARCH_TIMEOUT_SECS,
            scoring_secs: DEFAULT_SCORING_TIMEOUT_SECS,
        }
    }
}

impl TimeoutConfig {
    pub fn research(&self) -> Duration {
        Duration::from_secs(self.research_secs)
    }

    pub fn scoring(&self) -> Duration {
        Duration::from_secs(self.scoring_secs)
    }
}

/// Defaults applied to sessions created without explicit planning parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningConfig {
    #[serde(default = "default_question_count")]
    pub default_question_count: u32,
    #[serde(default)]
    pub category_mix: CategoryMix,
}

fn default_question_count() -> u32 {
    DEFAULT_QUESTION_COUNT
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            default_question_count: DEFAULT_QUESTION_COUNT,
            category_mix: CategoryMix::default(),
        }
    }
}

impl PrepConfig {
    /// Rejects values that would make every session fail.
    pub fn validate(&self) -> Result<()> {
        if self.timeouts.research_secs == 0 || self.timeouts.scoring_secs == 0 {
            return Err(PrepError::config("timeouts must be at least one second"));
        }
        self.planning
            .plan_request()
            .validate()
            .map_err(|e| PrepError::config(format!("[planning] {}", e)))
    }
}

impl PlanningConfig {
    pub fn plan_request(&self) -> PlanRequest {
        PlanRequest::new(self.default_question_count, self.category_mix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: PrepConfig = toml::from_str("").unwrap();
        assert_eq!(config, PrepConfig::default());
        assert_eq!(config.timeouts.research(), Duration::from_secs(30));
        assert_eq!(config.planning.plan_request(), PlanRequest::default());
    }

    #[test]
    fn test_partial_config() {
        let config: PrepConfig = toml::from_str(
            r#"
data_dir = "/tmp/prep"

[timeouts]
research_secs = 5

[planning]
default_question_count = 3

[planning.category_mix]
technical = 1
behavioral = 0
company_specific = 0
"#,
        )
        .unwrap();

        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/prep")));
        assert_eq!(config.timeouts.research_secs, 5);
        assert_eq!(config.timeouts.scoring_secs, 60);
        assert_eq!(
            config.planning.plan_request(),
            PlanRequest::new(3, CategoryMix::new(1, 0, 0))
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unusable_values() {
        let mut config = PrepConfig::default();
        config.timeouts.scoring_secs = 0;
        assert!(matches!(config.validate(), Err(PrepError::Config(_))));

        let mut config = PrepConfig::default();
        config.planning.category_mix = CategoryMix::new(0, 0, 0);
        assert!(matches!(config.validate(), Err(PrepError::Config(_))));

        let mut config = PrepConfig::default();
        config.planning.default_question_count = u32::MAX;
        assert!(matches!(config.validate(), Err(PrepError::Config(_))));
    }
}
