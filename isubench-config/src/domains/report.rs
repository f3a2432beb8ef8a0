//! Verdict report sink configuration

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Report sink configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReportConfig {
    /// File the JSON verdict is written to; no report is written when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Validatable for ReportConfig {
    fn validate(&self) -> ConfigResult<()> {
        if let Some(ref path) = self.path {
            if path.as_os_str().is_empty() {
                return Err(self.validation_error("path cannot be empty when set"));
            }
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "report"
    }
}
