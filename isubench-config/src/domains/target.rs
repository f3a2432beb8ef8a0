//! Target service and run-mode configuration

use crate::error::ConfigResult;
use crate::validation::{validate_host, Validatable};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Benchmark stage, which decides how much load the run generates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Every load worker runs a single iteration
    #[default]
    Test,
    /// Workers repeat until the load deadline and scale with the controller
    Prod,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Test => "test",
            Stage::Prod => "prod",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "test" => Ok(Stage::Test),
            "prod" => Ok(Stage::Prod),
            other => Err(format!("unknown stage '{}', expected test or prod", other)),
        }
    }
}

/// Target service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Target host with port, without scheme
    #[serde(default = "default_host")]
    pub host: String,

    /// Stage of the run
    #[serde(default)]
    pub stage: Stage,

    /// Only run initialize and the validation scenario
    #[serde(default = "crate::domains::utils::default_false")]
    pub prepare_only: bool,

    /// Exit with a non-zero status when the run fails
    #[serde(default = "crate::domains::utils::default_true")]
    pub exit_error_on_fail: bool,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            stage: Stage::default(),
            prepare_only: false,
            exit_error_on_fail: true,
        }
    }
}

impl TargetConfig {
    /// Base URL every agent resolves request paths against
    pub fn base_url(&self) -> ConfigResult<url::Url> {
        Ok(url::Url::parse(&format!("http://{}/", self.host))?)
    }
}

impl Validatable for TargetConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_host(&self.host, "host", self.domain_name())
    }

    fn domain_name(&self) -> &'static str {
        "target"
    }
}

fn default_host() -> String {
    "localhost:8080".to_string()
}
