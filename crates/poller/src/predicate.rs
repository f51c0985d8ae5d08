//! Predicate trait for poll observations
//!
//! A predicate observes the remote resource once per tick and reports
//! satisfied / not-yet, or an error that the poll loop classifies.
//! All predicate futures must be `Send` to work with Tokio's work-stealing runtime.

use crate::classify::Classify;
use std::fmt;
use std::future::Future;

/// Result of one successful observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// The awaited state has been reached
    Satisfied,
    /// Not there yet, keep ticking
    NotYet,
}

impl From<bool> for Check {
    fn from(satisfied: bool) -> Self {
        if satisfied { Check::Satisfied } else { Check::NotYet }
    }
}

/// Observation function invoked once per tick.
///
/// Invocations never overlap: the poll loop awaits each `check` before
/// scheduling the next tick.
#[async_trait::async_trait]
pub trait Predicate: Send {
    /// Error reported when the observation itself fails
    type Error: Classify + fmt::Display + Send;

    /// Observe the resource once
    async fn check(&mut self) -> Result<Check, Self::Error>;
}

/// [`Predicate`] backed by an async closure.
///
/// Built with [`predicate_fn`].
pub struct FnPredicate<F> {
    f: F,
}

impl<F> fmt::Debug for FnPredicate<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPredicate").finish_non_exhaustive()
    }
}

/// Wrap an async closure returning `Result<Check, E>` as a [`Predicate`].
pub fn predicate_fn<F, Fut, E>(f: F) -> FnPredicate<F>
where
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = Result<Check, E>> + Send,
    E: Classify + fmt::Display + Send,
{
    FnPredicate { f }
}

#[async_trait::async_trait]
impl<F, Fut, E> Predicate for FnPredicate<F>
where
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = Result<Check, E>> + Send,
    E: Classify + fmt::Display + Send,
{
    type Error = E;

    async fn check(&mut self) -> Result<Check, E> {
        (self.f)().await
    }
}

#[async_trait::async_trait]
impl<P: Predicate + ?Sized> Predicate for Box<P> {
    type Error = P::Error;

    async fn check(&mut self) -> Result<Check, P::Error> {
        (**self).check().await
    }
}
