//! Progress reporting for in-flight waits. The poll loop emits one event per
//! non-terminal tick; the presentation layer consumes them through a sink.

use std::fmt;
use std::time::Duration;

/// What the last tick observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LastObservation {
    /// Predicate ran and reported not-yet
    NotYet,
    /// Predicate failed with a transient error, message attached
    TransientError(String),
}

/// One progress update, emitted after a tick that did not end the wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    /// Tick number, 1-indexed
    pub attempt: u32,
    /// Time since the wait started
    pub elapsed: Duration,
    /// Observation from this tick
    pub last: LastObservation,
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "attempt {}, {}s elapsed", self.attempt, self.elapsed.as_secs())?;
        if let LastObservation::TransientError(message) = &self.last {
            write!(f, " (last error: {message})")?;
        }
        Ok(())
    }
}

/// Consumer of progress events.
///
/// Reporting is best-effort: nothing a sink does can change the outcome of
/// the wait, and no return value is consulted.
pub trait ProgressSink: Send + Sync {
    /// Receive one event
    fn report(&self, event: &ProgressEvent);
}

impl<F> ProgressSink for F
where
    F: Fn(&ProgressEvent) + Send + Sync,
{
    fn report(&self, event: &ProgressEvent) {
        self(event);
    }
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl ProgressSink for NoopSink {
    fn report(&self, _event: &ProgressEvent) {}
}
