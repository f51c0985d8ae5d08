//! Observation error classification
//!
//! Decides whether an observation error is retried on the next tick or ends
//! the wait. Error types carry their own default through [`Classify`]; a
//! [`PollSpec`](crate::PollSpec) may override it with a classifier closure.

/// How the poll loop treats an observation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Treated as "not yet" for the tick and retried on the next one
    Transient,
    /// Ends the wait with `ObservationFailed`
    Fatal,
}

/// Default severity of an observation error.
pub trait Classify {
    /// Classify this error
    fn severity(&self) -> Severity;
}

impl Classify for std::convert::Infallible {
    fn severity(&self) -> Severity {
        match *self {}
    }
}
