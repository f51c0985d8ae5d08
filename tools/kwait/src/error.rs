//! CLI error types.
//!
//! Failures that happen before a wait starts. Once the wait is running every
//! result is an `Outcome`, mapped to an exit code instead.

use resource_client::{InvalidCondition, ResourceError};
use thiserror::Error;

/// Errors that can occur while setting up a wait.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unparseable wait condition
    #[error(transparent)]
    Condition(#[from] InvalidCondition),

    /// Resource client error (connection, unknown kind)
    #[error("Resource client error: {0}")]
    Resource(#[from] ResourceError),
}
