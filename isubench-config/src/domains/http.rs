//! HTTP agent configuration

use crate::error::ConfigResult;
use crate::validation::{validate_duration, validate_required_string, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HTTP agent configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Timeout applied to every flow request
    #[serde(with = "humantime_serde", default = "default_request_timeout")]
    pub request_timeout: Duration,

    /// Timeout applied to `POST /initialize`
    #[serde(with = "humantime_serde", default = "default_initialize_timeout")]
    pub initialize_timeout: Duration,

    /// User agent string
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout: default_request_timeout(),
            initialize_timeout: default_initialize_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Validatable for HttpConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_duration(self.request_timeout, "request_timeout", self.domain_name())?;
        validate_duration(self.initialize_timeout, "initialize_timeout", self.domain_name())?;
        validate_required_string(&self.user_agent, "user_agent", self.domain_name())?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "http"
    }
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(3)
}

fn default_initialize_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_user_agent() -> String {
    "isubench/1.0".to_string()
}
