//! Logging infrastructure for isubench
//!
//! Output is split by audience. Events with the `contestant` target are the
//! run narrative shown to whoever operates the target service and go to
//! stdout. Everything else, including events with the `admin` target, is
//! operator diagnostics and goes to stderr.

pub mod audience;
pub mod init;

pub use audience::{StepTimer, ADMIN, CONTESTANT};
pub use init::{init_logging_from_config, init_simple_tracing};
