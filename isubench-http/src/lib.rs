//! HTTP plumbing for isubench
//!
//! An [`Agent`] is one simulated client: a cookie-carrying `reqwest` client
//! bound to the target's base URL. Endpoint [`actions`] build a request,
//! stamp the protocol headers and return the fully read [`Captured`] response
//! for the validators.

pub mod actions;
pub mod agent;
pub mod errors;
pub mod headers;
pub mod types;

pub use actions::Login;
pub use agent::{Agent, AgentFactory, AgentKind, Captured};
pub use errors::HttpError;
pub use headers::{flow_date, format_isu_date, isu_date_for};
pub use types::HttpMethod;
