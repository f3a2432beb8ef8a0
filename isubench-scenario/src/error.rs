//! Errors that stop the orchestrator itself, as opposed to recorded failures

use isubench_execution::ExecutionError;
use isubench_http::HttpError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Failed to set up the HTTP client: {0}")]
    Http(#[from] HttpError),

    #[error("Failed to build the load workers: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Failed to write the report to {path}: {source}")]
    Report {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize the report: {0}")]
    Serialize(#[from] serde_json::Error),
}
