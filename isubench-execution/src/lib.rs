//! Load execution for isubench
//!
//! A [`Worker`] runs one scenario function at a configurable concurrency.
//! The [`Controller`] watches error and success counters on a fixed tick and
//! only ever raises that concurrency. [`RunContext`] owns the root
//! cancellation token every blocking operation observes.

pub mod controller;
pub mod error;
pub mod shutdown;
pub mod worker;

pub use controller::{login_step, registration_step, Controller, ControllerConfig, ControllerOutcome, LoadGauge};
pub use error::ExecutionError;
pub use shutdown::{shutdown_signal, sleep_with_cancel, RunContext};
pub use worker::{LoopMode, ScenarioFn, Worker};
