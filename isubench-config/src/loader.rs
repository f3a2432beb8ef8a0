//! Configuration loading and environment variable handling

use crate::domains::BenchConfig;
use crate::error::{ConfigError, ConfigResult};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Configuration loader with environment variable support
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: String,
}

impl ConfigLoader {
    /// Create a new config loader with default prefix
    pub fn new() -> Self {
        Self {
            prefix: "ISUBENCH".to_string(),
        }
    }

    /// Create a new config loader with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from a YAML file with environment overrides
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<BenchConfig> {
        let content = std::fs::read_to_string(path)?;
        let mut config: BenchConfig = serde_yaml::from_str(&content)?;

        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env(&self) -> ConfigResult<BenchConfig> {
        let mut config = BenchConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration with fallback chain
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<BenchConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    fn apply_env_overrides(&self, config: &mut BenchConfig) -> ConfigResult<()> {
        self.apply_target_overrides(&mut config.target)?;
        self.apply_http_overrides(&mut config.http)?;
        self.apply_load_overrides(&mut config.load)?;
        self.apply_logging_overrides(&mut config.logging)?;
        self.apply_path_overrides(config);
        Ok(())
    }

    fn apply_target_overrides(
        &self,
        config: &mut crate::domains::target::TargetConfig,
    ) -> ConfigResult<()> {
        if let Ok(host) = self.get_env_var("TARGET_HOST") {
            config.host = host;
        }

        if let Ok(stage) = self.get_env_var("STAGE") {
            config.stage = crate::domains::target::Stage::from_str(&stage)
                .map_err(|e| ConfigError::EnvError(format!("Invalid STAGE: {}", e)))?;
        }

        if let Ok(prepare_only) = self.get_env_var("PREPARE_ONLY") {
            config.prepare_only = prepare_only
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid PREPARE_ONLY: {}", e)))?;
        }

        if let Ok(exit_error) = self.get_env_var("EXIT_ERROR_ON_FAIL") {
            config.exit_error_on_fail = exit_error.parse().map_err(|e| {
                ConfigError::EnvError(format!("Invalid EXIT_ERROR_ON_FAIL: {}", e))
            })?;
        }

        Ok(())
    }

    fn apply_http_overrides(
        &self,
        config: &mut crate::domains::http::HttpConfig,
    ) -> ConfigResult<()> {
        if let Ok(timeout) = self.get_env_var("REQUEST_TIMEOUT") {
            config.request_timeout = parse_duration("REQUEST_TIMEOUT", &timeout)?;
        }

        if let Ok(timeout) = self.get_env_var("INITIALIZE_REQUEST_TIMEOUT") {
            config.initialize_timeout = parse_duration("INITIALIZE_REQUEST_TIMEOUT", &timeout)?;
        }

        if let Ok(user_agent) = self.get_env_var("USER_AGENT") {
            config.user_agent = user_agent;
        }

        Ok(())
    }

    fn apply_load_overrides(
        &self,
        config: &mut crate::domains::load::LoadConfig,
    ) -> ConfigResult<()> {
        if let Ok(parallelism) = self.get_env_var("MAX_PARALLELISM") {
            config.max_parallelism = parallelism
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid MAX_PARALLELISM: {}", e)))?;
        }

        if let Ok(duration) = self.get_env_var("LOAD_DURATION") {
            config.duration = parse_duration("LOAD_DURATION", &duration)?;
        }

        Ok(())
    }

    fn apply_logging_overrides(
        &self,
        config: &mut crate::domains::logging::LoggingConfig,
    ) -> ConfigResult<()> {
        if let Ok(log_level) = self.get_env_var("LOG_LEVEL") {
            config.level = crate::domains::logging::LogLevel::from_str(&log_level)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_LEVEL: {}", log_level)))?;
        }

        if let Ok(format) = self.get_env_var("LOG_FORMAT") {
            config.format = crate::domains::logging::LogFormat::from_str(&format)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_FORMAT: {}", format)))?;
        }

        if let Ok(operator_log) = self.get_env_var("OPERATOR_LOG") {
            config.operator_log = operator_log
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid OPERATOR_LOG: {}", e)))?;
        }

        Ok(())
    }

    fn apply_path_overrides(&self, config: &mut BenchConfig) {
        if let Ok(dir) = self.get_env_var("DUMP_DIR") {
            config.fixtures.dump_dir = PathBuf::from(dir);
        }

        if let Ok(dir) = self.get_env_var("RESOURCE_DIR") {
            config.fixtures.resource_dir = PathBuf::from(dir);
        }

        if let Ok(path) = self.get_env_var("REPORT_PATH") {
            config.report.path = Some(PathBuf::from(path));
        }
    }

    /// Get environment variable with prefix
    fn get_env_var(&self, name: &str) -> Result<String, std::env::VarError> {
        std::env::var(format!("{}_{}", self.prefix, name))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_duration(name: &str, value: &str) -> ConfigResult<Duration> {
    humantime_serde::re::humantime::parse_duration(value)
        .map_err(|e| ConfigError::EnvError(format!("Invalid {}: {}", name, e)))
}
