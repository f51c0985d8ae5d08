//! Poller errors

use std::time::Duration;
use thiserror::Error;

/// Errors raised while building a [`PollSpec`](crate::PollSpec).
///
/// A running wait never produces these; every wait ends in an
/// [`Outcome`](crate::Outcome).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PollerError {
    /// Interval must be a positive duration
    #[error("Invalid interval: {0:?} (must be greater than zero)")]
    InvalidInterval(Duration),

    /// Timeout must be a positive duration
    #[error("Invalid timeout: {0:?} (must be greater than zero)")]
    InvalidTimeout(Duration),
}
