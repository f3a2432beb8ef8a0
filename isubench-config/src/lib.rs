//! Domain-driven configuration for the isubench benchmarker
//!
//! Configuration is split by concern (target, http, load, logging, fixtures,
//! report). Each domain carries its own defaults and validation, and the
//! [`ConfigLoader`] layers YAML files with `ISUBENCH_*` environment overrides.

pub mod error;
pub mod loader;
pub mod validation;

pub mod domains;

pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;

pub use domains::{
    fixtures::FixturesConfig,
    http::HttpConfig,
    load::LoadConfig,
    logging::{LogFormat, LogLevel, LoggingConfig},
    report::ReportConfig,
    target::{Stage, TargetConfig},
    BenchConfig,
};
