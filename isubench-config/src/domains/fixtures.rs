//! Fixture and master-data file locations

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where fixture snapshots and master-data bundles live
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FixturesConfig {
    /// Directory with the pre-generated JSON fixture snapshots
    #[serde(default = "default_dump_dir")]
    pub dump_dir: PathBuf,

    /// Directory with the CSV master-data bundles uploaded by the master refresh
    #[serde(default = "default_resource_dir")]
    pub resource_dir: PathBuf,
}

impl Default for FixturesConfig {
    fn default() -> Self {
        Self {
            dump_dir: default_dump_dir(),
            resource_dir: default_resource_dir(),
        }
    }
}

impl FixturesConfig {
    pub fn dump_file(&self, name: &str) -> PathBuf {
        self.dump_dir.join(name)
    }

    pub fn resource_file(&self, name: &str) -> PathBuf {
        self.resource_dir.join(name)
    }
}

impl Validatable for FixturesConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.dump_dir.as_os_str().is_empty() {
            return Err(self.validation_error("dump_dir cannot be empty"));
        }
        if self.resource_dir.as_os_str().is_empty() {
            return Err(self.validation_error("resource_dir cannot be empty"));
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "fixtures"
    }
}

fn default_dump_dir() -> PathBuf {
    PathBuf::from("./dump")
}

fn default_resource_dir() -> PathBuf {
    PathBuf::from("./resource")
}
