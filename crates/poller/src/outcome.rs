//! Terminal outcome of a wait

use std::fmt;

/// Terminal result of one wait invocation.
///
/// Exactly one `Outcome` is produced per call to
/// [`Poller::wait`](crate::Poller::wait).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<E> {
    /// The predicate reported the awaited state
    Satisfied,
    /// The deadline passed before the predicate was satisfied
    TimedOut,
    /// Cancellation was requested
    Cancelled,
    /// The predicate failed with an error classified as fatal
    ObservationFailed(E),
}

impl<E> Outcome<E> {
    /// Returns true for [`Outcome::Satisfied`]
    #[must_use]
    pub fn is_satisfied(&self) -> bool {
        matches!(self, Outcome::Satisfied)
    }

    /// Short lowercase name of the variant, for structured log fields
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Satisfied => "satisfied",
            Outcome::TimedOut => "timed-out",
            Outcome::Cancelled => "cancelled",
            Outcome::ObservationFailed(_) => "observation-failed",
        }
    }
}

impl<E: fmt::Display> fmt::Display for Outcome<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Satisfied => f.write_str("condition satisfied"),
            Outcome::TimedOut => f.write_str("timed out"),
            Outcome::Cancelled => f.write_str("cancelled"),
            Outcome::ObservationFailed(e) => write!(f, "observation failed: {e}"),
        }
    }
}
