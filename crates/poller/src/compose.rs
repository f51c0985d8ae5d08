//! Composition of independent waits
//!
//! Waits share no state, so composing them is plain future combination on
//! the caller's task. Each wait still honours its own interval, timeout and
//! the shared cancellation source.

use crate::cancel::CancelSignal;
use crate::outcome::Outcome;
use crate::poller::Poller;
use crate::predicate::Predicate;
use crate::progress::ProgressSink;
use crate::spec::PollSpec;
use futures::future::join_all;
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::debug;

/// Outcome of one wait inside a composed wait, with its position in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settled<E> {
    /// Index of the spec in the input vector
    pub index: usize,
    /// Terminal outcome of that wait
    pub outcome: Outcome<E>,
}

/// Wait for every spec concurrently.
///
/// Returns one outcome per spec, in input order.
pub async fn wait_all<P, S, C>(
    poller: &Poller<S>,
    specs: Vec<PollSpec<P>>,
    cancel: &C,
) -> Vec<Outcome<P::Error>>
where
    P: Predicate,
    S: ProgressSink,
    C: CancelSignal + ?Sized,
{
    debug!("Waiting for all of {} targets", specs.len());
    join_all(specs.into_iter().map(|spec| poller.wait(spec, cancel))).await
}

/// Wait until any spec is satisfied.
///
/// Returns the first wait to settle as `Satisfied`; the remaining waits are
/// dropped at that point. When no wait is satisfied, returns whichever
/// settled last. Returns `None` for an empty input.
pub async fn wait_any<P, S, C>(
    poller: &Poller<S>,
    specs: Vec<PollSpec<P>>,
    cancel: &C,
) -> Option<Settled<P::Error>>
where
    P: Predicate,
    S: ProgressSink,
    C: CancelSignal + ?Sized,
{
    debug!("Waiting for any of {} targets", specs.len());

    let mut pending: FuturesUnordered<_> = specs
        .into_iter()
        .enumerate()
        .map(|(index, spec)| async move {
            Settled {
                index,
                outcome: poller.wait(spec, cancel).await,
            }
        })
        .collect();

    let mut last = None;
    while let Some(settled) = pending.next().await {
        if settled.outcome.is_satisfied() {
            debug!("Target {} satisfied first", settled.index);
            return Some(settled);
        }
        last = Some(settled);
    }
    last
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::Never;
    use crate::classify::{Classify, Severity};
    use crate::predicate::{predicate_fn, Check};
    use std::fmt;
    use std::time::Duration;
    use tokio::time::Instant;
    use tokio_util::sync::CancellationToken;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Denied;

    impl fmt::Display for Denied {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("permission denied")
        }
    }

    impl Classify for Denied {
        fn severity(&self) -> Severity {
            Severity::Fatal
        }
    }

    type BoxedPredicate = Box<dyn Predicate<Error = Denied>>;

    /// Satisfied on the `n`th observation
    fn ready_after(n: u32) -> BoxedPredicate {
        let mut seen = 0;
        Box::new(predicate_fn(move || {
            seen += 1;
            let ready = seen >= n;
            async move { Ok::<_, Denied>(Check::from(ready)) }
        }))
    }

    fn never_ready() -> BoxedPredicate {
        Box::new(predicate_fn(|| async { Ok::<_, Denied>(Check::NotYet) }))
    }

    fn denied() -> BoxedPredicate {
        Box::new(predicate_fn(|| async { Err::<Check, _>(Denied) }))
    }

    fn spec(predicate: BoxedPredicate, timeout_secs: u64) -> PollSpec<BoxedPredicate> {
        PollSpec::new(Duration::from_secs(1), Duration::from_secs(timeout_secs), predicate).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_all_preserves_order() {
        let specs = vec![spec(ready_after(3), 10), spec(never_ready(), 2), spec(denied(), 10)];

        let started = Instant::now();
        let outcomes = wait_all(&Poller::new(), specs, &Never).await;

        assert_eq!(
            outcomes,
            vec![Outcome::Satisfied, Outcome::TimedOut, Outcome::ObservationFailed(Denied)]
        );
        // Waits run concurrently: the slowest finishes at t=3
        assert_eq!(started.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_any_returns_first_satisfied() {
        let specs = vec![spec(ready_after(5), 10), spec(denied(), 10), spec(ready_after(2), 10)];

        let started = Instant::now();
        let settled = wait_any(&Poller::new(), specs, &Never).await.unwrap();

        assert_eq!(settled, Settled { index: 2, outcome: Outcome::Satisfied });
        assert_eq!(started.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_any_without_satisfaction_returns_last_settled() {
        let specs = vec![spec(denied(), 10), spec(never_ready(), 3)];

        let settled = wait_any(&Poller::new(), specs, &Never).await.unwrap();

        assert_eq!(settled, Settled { index: 1, outcome: Outcome::TimedOut });
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_any_empty() {
        let settled = wait_any(&Poller::new(), Vec::<PollSpec<BoxedPredicate>>::new(), &Never).await;
        assert!(settled.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shared_cancellation_stops_every_wait() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let specs = vec![spec(ready_after(1), 10), spec(never_ready(), 10)];
        let outcomes = wait_all(&Poller::new(), specs, &cancel).await;

        assert_eq!(outcomes, vec![Outcome::Cancelled, Outcome::Cancelled]);
    }
}
