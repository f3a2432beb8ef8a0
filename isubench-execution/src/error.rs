//! Error types for load execution

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("Invalid parallelism for worker {worker}: {value}")]
    InvalidParallelism { worker: String, value: i64 },

    #[error("Invalid controller setting: {0}")]
    InvalidController(String),
}
