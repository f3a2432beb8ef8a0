//! CLI argument parsing definitions

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use humantime_serde::re::humantime::parse_duration;
use isubench_config::{BenchConfig, LogLevel, Stage};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Target host with port (example: localhost:8080)
    #[arg(long, value_name = "HOST")]
    pub target_host: Option<String>,

    /// Timeout of a regular request (example: 3s)
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub request_timeout: Option<Duration>,

    /// Timeout of POST /initialize (example: 60s)
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub initialize_request_timeout: Option<Duration>,

    /// Exit non-zero when the run fails
    #[arg(long, value_name = "BOOL")]
    pub exit_error_on_fail: Option<bool>,

    /// Benchmark stage: test or prod
    #[arg(long, value_name = "STAGE")]
    pub stage: Option<Stage>,

    /// Concurrency cap of each load worker in the prod stage
    #[arg(long, value_name = "N")]
    pub max_parallelism: Option<i64>,

    /// Only initialize and validate; skip the load phase
    #[arg(long)]
    pub prepare_only: bool,

    /// Write the JSON verdict to this file
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Configuration management commands
    Config {
        #[command(subcommand)]
        config_cmd: ConfigCommands,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Print a sample configuration file
    Sample,
}

impl Cli {
    /// Flags win over the file and the environment
    pub fn apply_overrides(&self, config: &mut BenchConfig) -> Result<()> {
        if let Some(level) = &self.log_level {
            config.logging.level = LogLevel::from_str(level).map_err(|e| anyhow!(e))?;
        }
        if let Some(host) = &self.target_host {
            config.target.host = host.clone();
        }
        if let Some(timeout) = self.request_timeout {
            config.http.request_timeout = timeout;
        }
        if let Some(timeout) = self.initialize_request_timeout {
            config.http.initialize_timeout = timeout;
        }
        if let Some(exit) = self.exit_error_on_fail {
            config.target.exit_error_on_fail = exit;
        }
        if let Some(stage) = self.stage {
            config.target.stage = stage;
        }
        if let Some(max) = self.max_parallelism {
            config.load.max_parallelism = max;
        }
        if self.prepare_only {
            config.target.prepare_only = true;
        }
        if let Some(path) = &self.report {
            config.report.path = Some(path.clone());
        }
        Ok(())
    }
}
