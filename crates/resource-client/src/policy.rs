//! Retry classification policy
//!
//! Translates failures of the Kubernetes API into [`ResourceError`]s so the
//! poll loop can decide between retrying on the next tick and giving up.
//!
//! Default policy:
//! - 404 → `NotFound`
//! - 408, 429, 500, 502, 503, 504 → `Transient` (timeouts, rate limiting, server overload)
//! - other API status codes (400, 401, 403, 422, ...) → `Fatal`
//! - response decoding failures → `Fatal`
//! - transport failures (connection refused, reset, TLS handshake) → `Transient`

use crate::error::ResourceError;
use std::collections::BTreeSet;

/// HTTP status codes retried by default
pub const DEFAULT_TRANSIENT_CODES: [u16; 6] = [408, 429, 500, 502, 503, 504];

/// Decides which API failures are worth retrying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    transient_codes: BTreeSet<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::with_transient_codes(DEFAULT_TRANSIENT_CODES)
    }
}

impl RetryPolicy {
    /// Create a policy retrying exactly the given HTTP status codes
    pub fn with_transient_codes(codes: impl IntoIterator<Item = u16>) -> Self {
        Self {
            transient_codes: codes.into_iter().collect(),
        }
    }

    /// Returns true when an API response with this status code should be retried
    #[must_use]
    pub fn is_transient_code(&self, code: u16) -> bool {
        self.transient_codes.contains(&code)
    }

    /// Classify an HTTP status returned by the API server
    ///
    /// # Arguments
    /// * `code` - HTTP status code
    /// * `context` - What was being fetched, e.g. "Service default/my-svc"
    /// * `message` - Message from the API server
    #[must_use]
    pub fn classify_status(&self, code: u16, context: &str, message: &str) -> ResourceError {
        if code == 404 {
            ResourceError::NotFound(context.to_string())
        } else if self.is_transient_code(code) {
            ResourceError::Transient(format!("{context}: {code} {message}"))
        } else {
            ResourceError::Fatal(format!("{context}: {code} {message}"))
        }
    }

    /// Classify a failed kube request
    #[must_use]
    pub fn classify_kube_error(&self, error: &kube::Error, context: &str) -> ResourceError {
        match error {
            kube::Error::Api(response) => self.classify_status(response.code, context, &response.message),
            kube::Error::SerdeError(e) => {
                ResourceError::Fatal(format!("{context}: malformed response: {e}"))
            }
            // Everything else fails below the API layer: connection, TLS, body streaming
            other => ResourceError::Transient(format!("{context}: {other}")),
        }
    }
}
