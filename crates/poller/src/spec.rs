//! Poll specification

use crate::classify::{Classify, Severity};
use crate::error::PollerError;
use crate::predicate::Predicate;
use std::fmt;
use std::time::Duration;

type Classifier<E> = Box<dyn Fn(&E) -> Severity + Send + Sync>;

/// Configuration for one wait: tick interval, overall timeout, and the
/// predicate to observe.
///
/// A `PollSpec` is consumed by [`Poller::wait`](crate::Poller::wait) and is
/// never shared between invocations.
pub struct PollSpec<P: Predicate> {
    pub(crate) interval: Duration,
    pub(crate) timeout: Duration,
    pub(crate) predicate: P,
    pub(crate) classifier: Option<Classifier<P::Error>>,
}

impl<P: Predicate> PollSpec<P> {
    /// Create a new poll specification
    ///
    /// # Arguments
    ///
    /// * `interval` - Time between ticks; the first tick fires one interval after the wait starts
    /// * `timeout` - Overall budget measured from the start of the wait
    /// * `predicate` - Observation invoked at most once per tick
    ///
    /// A timeout shorter than the interval is accepted: such a wait times out
    /// without ever invoking the predicate.
    ///
    /// # Errors
    ///
    /// Returns [`PollerError`] if either duration is zero.
    pub fn new(interval: Duration, timeout: Duration, predicate: P) -> Result<Self, PollerError> {
        if interval.is_zero() {
            return Err(PollerError::InvalidInterval(interval));
        }
        if timeout.is_zero() {
            return Err(PollerError::InvalidTimeout(timeout));
        }

        Ok(Self {
            interval,
            timeout,
            predicate,
            classifier: None,
        })
    }

    /// Override the default [`Classify`] policy of the predicate's error type
    #[must_use]
    pub fn with_classifier<C>(mut self, classifier: C) -> Self
    where
        C: Fn(&P::Error) -> Severity + Send + Sync + 'static,
    {
        self.classifier = Some(Box::new(classifier));
        self
    }

    /// Tick interval
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Overall timeout
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub(crate) fn severity_of(&self, error: &P::Error) -> Severity {
        match &self.classifier {
            Some(classify) => classify(error),
            None => error.severity(),
        }
    }
}

impl<P: Predicate> fmt::Debug for PollSpec<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollSpec")
            .field("interval", &self.interval)
            .field("timeout", &self.timeout)
            .field("custom_classifier", &self.classifier.is_some())
            .finish_non_exhaustive()
    }
}
