//! Load phase, controller and scoring configuration

use crate::error::ConfigResult;
use crate::validation::{validate_duration, validate_positive, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Load phase configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    /// Length of the timed load phase
    #[serde(with = "humantime_serde", default = "default_duration")]
    pub duration: Duration,

    /// Upper bound on per-worker parallelism in the prod stage
    #[serde(default = "default_max_parallelism")]
    pub max_parallelism: i64,

    /// Controller tick interval
    #[serde(with = "humantime_serde", default = "default_controller_interval")]
    pub controller_interval: Duration,

    /// Load-phase error count that aborts the run
    #[serde(default = "default_error_cap")]
    pub error_cap: u64,

    /// Per-tick error growth above which parallelism is frozen
    #[serde(default = "default_error_jump_threshold")]
    pub error_jump_threshold: u64,

    /// Delay before the master-refresh flow fires
    #[serde(with = "humantime_serde", default = "default_master_refresh_delay")]
    pub master_refresh_delay: Duration,

    /// Pause between ban-flow attempts
    #[serde(with = "humantime_serde", default = "default_ban_interval")]
    pub ban_interval: Duration,

    /// Wait after the run before errors are aggregated
    #[serde(with = "humantime_serde", default = "default_grace_period")]
    pub grace_period: Duration,

    /// Points deducted per scenario error
    #[serde(default = "default_error_deduction")]
    pub error_deduction: i64,

    /// Number of scenario errors printed before the summary line
    #[serde(default = "default_error_display_cap")]
    pub error_display_cap: usize,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            duration: default_duration(),
            max_parallelism: default_max_parallelism(),
            controller_interval: default_controller_interval(),
            error_cap: default_error_cap(),
            error_jump_threshold: default_error_jump_threshold(),
            master_refresh_delay: default_master_refresh_delay(),
            ban_interval: default_ban_interval(),
            grace_period: default_grace_period(),
            error_deduction: default_error_deduction(),
            error_display_cap: default_error_display_cap(),
        }
    }
}

impl Validatable for LoadConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_duration(self.duration, "duration", self.domain_name())?;
        validate_positive(self.max_parallelism, "max_parallelism", self.domain_name())?;
        validate_duration(self.controller_interval, "controller_interval", self.domain_name())?;
        validate_positive(self.error_cap, "error_cap", self.domain_name())?;

        if self.error_deduction < 0 {
            return Err(self.validation_error(format!(
                "error_deduction cannot be negative, got {}",
                self.error_deduction
            )));
        }

        if self.master_refresh_delay >= self.duration {
            log::warn!(
                "master_refresh_delay {:?} is not shorter than the load duration {:?}; the refresh will never fire",
                self.master_refresh_delay,
                self.duration
            );
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "load"
    }
}

fn default_duration() -> Duration {
    Duration::from_secs(60)
}

fn default_max_parallelism() -> i64 {
    100
}

fn default_controller_interval() -> Duration {
    Duration::from_secs(10)
}

fn default_error_cap() -> u64 {
    50
}

fn default_error_jump_threshold() -> u64 {
    5
}

fn default_master_refresh_delay() -> Duration {
    Duration::from_secs(20)
}

fn default_ban_interval() -> Duration {
    Duration::from_millis(500)
}

fn default_grace_period() -> Duration {
    Duration::from_secs(3)
}

fn default_error_deduction() -> i64 {
    15
}

fn default_error_display_cap() -> usize {
    50
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_defaults() {
        let config = LoadConfig::default();
        assert_eq!(config.duration, Duration::from_secs(60));
        assert_eq!(config.max_parallelism, 100);
        assert_eq!(config.controller_interval, Duration::from_secs(10));
        assert_eq!(config.error_cap, 50);
        assert_eq!(config.error_jump_threshold, 5);
        assert_eq!(config.master_refresh_delay, Duration::from_secs(20));
        assert_eq!(config.error_deduction, 15);
    }

    #[test]
    fn test_load_config_validation() {
        let mut config = LoadConfig::default();
        assert!(config.validate().is_ok());

        config.max_parallelism = 0;
        assert!(config.validate().is_err());

        config = LoadConfig::default();
        config.error_deduction = -1;
        assert!(config.validate().is_err());

        config = LoadConfig::default();
        config.error_cap = 0;
        assert!(config.validate().is_err());
    }
}
