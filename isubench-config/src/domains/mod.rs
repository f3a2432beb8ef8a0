//! Domain-specific configuration modules

pub mod fixtures;
pub mod http;
pub mod load;
pub mod logging;
pub mod report;
pub mod target;
pub mod utils;

use crate::error::{ConfigError, ConfigResult};
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Main benchmarker configuration combining all domains
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BenchConfig {
    /// Target service and run mode
    #[serde(default)]
    pub target: target::TargetConfig,

    /// HTTP agent configuration
    #[serde(default)]
    pub http: http::HttpConfig,

    /// Load phase and controller tuning
    #[serde(default)]
    pub load: load::LoadConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: logging::LoggingConfig,

    /// Fixture and master-data locations
    #[serde(default)]
    pub fixtures: fixtures::FixturesConfig,

    /// Verdict report sink
    #[serde(default)]
    pub report: report::ReportConfig,
}

impl BenchConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.target.validate()?;
        self.http.validate()?;
        self.load.validate()?;
        self.logging.validate()?;
        self.fixtures.validate()?;
        self.report.validate()?;

        // A single request must fit inside the load phase
        if self.http.request_timeout >= self.load.duration {
            return Err(ConfigError::ValidationError(format!(
                "http.request_timeout {:?} must be shorter than load.duration {:?}",
                self.http.request_timeout, self.load.duration
            )));
        }
        Ok(())
    }

    /// Maximum worker parallelism for the configured stage
    pub fn effective_max_parallelism(&self) -> i64 {
        match self.target.stage {
            target::Stage::Test => 1,
            target::Stage::Prod => self.load.max_parallelism,
        }
    }

    /// Render the flags this configuration corresponds to, for the admin log
    pub fn describe(&self) -> String {
        format!(
            "benchmarker --target-host={} --request-timeout={} --initialize-request-timeout={} --exit-error-on-fail={} --stage={} --max-parallelism={} --prepare-only={}",
            self.target.host,
            humantime_serde::re::humantime::format_duration(self.http.request_timeout),
            humantime_serde::re::humantime::format_duration(self.http.initialize_timeout),
            self.target.exit_error_on_fail,
            self.target.stage,
            self.load.max_parallelism,
            self.target.prepare_only,
        )
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let config = BenchConfig::default();
        serde_yaml::to_string(&config)
            .unwrap_or_else(|_| "# Failed to generate sample config".to_string())
    }
}
