//! Resource client errors

use poller::{Classify, Severity};
use thiserror::Error;

/// Errors that can occur when fetching a resource
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResourceError {
    /// The named object does not exist (HTTP 404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Recoverable failure (network blip, rate limiting, server overload)
    #[error("Transient error: {0}")]
    Transient(String),

    /// Unrecoverable failure (permission denied, malformed request or object)
    #[error("Fatal error: {0}")]
    Fatal(String),

    /// The kind is not in the registry
    #[error("Unknown kind: {0} (register it before looking it up)")]
    UnknownKind(String),
}

/// A wait condition string that could not be parsed
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid condition '{0}' (expected exists, deleted, external-ip, condition=<Type> or phase=<Phase>)")]
pub struct InvalidCondition(pub String);

impl ResourceError {
    /// Returns true for [`ResourceError::NotFound`]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, ResourceError::NotFound(_))
    }
}

/// A missing object is retried by default: freshly created objects may not
/// be visible yet. Use `PollSpec::with_classifier` to make it fatal.
impl Classify for ResourceError {
    fn severity(&self) -> Severity {
        match self {
            ResourceError::NotFound(_) | ResourceError::Transient(_) => Severity::Transient,
            ResourceError::Fatal(_) | ResourceError::UnknownKind(_) => Severity::Fatal,
        }
    }
}
