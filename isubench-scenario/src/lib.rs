//! Scenarios and run orchestration for isubench
//!
//! [`Session`] holds the shared state of one run. The [`flows`] module
//! contains the load-phase flows, [`validation`] the one-shot correctness
//! walk run during [`prepare`], and [`orchestrator`] ties both phases
//! together and produces the [`Verdict`].

pub mod error;
pub mod flows;
pub mod orchestrator;
pub mod prepare;
pub mod report;
pub mod session;
pub mod validation;

pub use error::ScenarioError;
pub use orchestrator::run;
pub use report::{judge, Verdict};
pub use session::Session;
pub use validation::run_validation;
