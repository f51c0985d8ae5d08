//! Poll loop
//!
//! Drives a fixed-interval, deadline-bounded observation loop. Each tick
//! runs the same sequence:
//!
//! 1. cancellation requested → `Cancelled`
//! 2. deadline reached → `TimedOut`
//! 3. invoke the predicate once
//! 4. satisfied → `Satisfied`; fatal error → `ObservationFailed`
//! 5. otherwise report progress and wait for the next tick
//!
//! The deadline is checked before the predicate runs, so a satisfied result
//! observed inside a tick always completes the wait.

use crate::cancel::CancelSignal;
use crate::classify::Severity;
use crate::outcome::Outcome;
use crate::predicate::{Check, Predicate};
use crate::progress::{LastObservation, NoopSink, ProgressEvent, ProgressSink};
use crate::spec::PollSpec;
use tokio::time::{self, Instant, MissedTickBehavior};
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Durations beyond this are treated as never elapsing, so instant
/// arithmetic cannot overflow.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Runs waits and reports their progress to a sink.
///
/// A `Poller` holds no per-wait state; one instance can drive any number of
/// independent, concurrent waits.
#[derive(Debug, Clone, Default)]
pub struct Poller<S = NoopSink> {
    sink: S,
}

impl Poller<NoopSink> {
    /// Creates a poller that discards progress events.
    #[must_use]
    pub fn new() -> Self {
        Self { sink: NoopSink }
    }
}

impl<S: ProgressSink> Poller<S> {
    /// Creates a poller reporting progress to `sink`.
    pub fn with_sink(sink: S) -> Self {
        Self { sink }
    }

    /// Progress sink this poller reports to
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Wait until the predicate of `spec` is satisfied, the timeout elapses,
    /// `cancel` fires, or the predicate fails fatally.
    ///
    /// Suspends the calling task between ticks; never busy-polls and never
    /// panics. Cancellation is observed at tick boundaries only, so a slow
    /// predicate call is allowed to finish. A tick that overruns its interval
    /// delays the next tick instead of dropping it, and the overrun still
    /// counts toward the deadline. Durations beyond thirty years never
    /// elapse. A panic inside the progress sink drops that event only.
    pub async fn wait<P, C>(&self, spec: PollSpec<P>, cancel: &C) -> Outcome<P::Error>
    where
        P: Predicate,
        C: CancelSignal + ?Sized,
    {
        let started = Instant::now();
        let deadline = started + spec.timeout.min(FAR_FUTURE);

        let interval = spec.interval.min(FAR_FUTURE);
        let mut ticker = time::interval_at(started + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let deadline_reached = time::sleep_until(deadline);
        tokio::pin!(deadline_reached);

        let mut spec = spec;
        let mut attempt: u32 = 0;

        debug!(
            "Starting wait (interval: {:?}, timeout: {:?})",
            spec.interval, spec.timeout
        );

        loop {
            // Wake on the next tick, or at the deadline when it comes first
            tokio::select! {
                biased;
                _ = ticker.tick() => {}
                () = &mut deadline_reached => {}
            }
            attempt = attempt.saturating_add(1);

            if cancel.is_cancelled() {
                info!("Wait cancelled at tick {} after {:?}", attempt, started.elapsed());
                return Outcome::Cancelled;
            }

            if Instant::now() >= deadline {
                warn!("Wait timed out at tick {} after {:?}", attempt, started.elapsed());
                return Outcome::TimedOut;
            }

            let last = match spec.predicate.check().await {
                Ok(Check::Satisfied) => {
                    info!("Condition satisfied at tick {} after {:?}", attempt, started.elapsed());
                    return Outcome::Satisfied;
                }
                Ok(Check::NotYet) => {
                    debug!("Tick {}: condition not yet satisfied", attempt);
                    LastObservation::NotYet
                }
                Err(e) => match spec.severity_of(&e) {
                    Severity::Fatal => {
                        warn!("Tick {}: fatal observation error: {}", attempt, e);
                        return Outcome::ObservationFailed(e);
                    }
                    Severity::Transient => {
                        warn!("Tick {}: transient observation error (will retry): {}", attempt, e);
                        LastObservation::TransientError(e.to_string())
                    }
                },
            };

            let event = ProgressEvent {
                attempt,
                elapsed: started.elapsed(),
                last,
            };
            if panic::catch_unwind(AssertUnwindSafe(|| self.sink.report(&event))).is_err() {
                warn!("Tick {}: progress sink panicked, event dropped", attempt);
            }
        }
    }
}

/// Wait on `spec` with a progress-less poller.
///
/// Shorthand for `Poller::new().wait(spec, cancel)`.
pub async fn wait<P, C>(spec: PollSpec<P>, cancel: &C) -> Outcome<P::Error>
where
    P: Predicate,
    C: CancelSignal + ?Sized,
{
    Poller::new().wait(spec, cancel).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::Never;
    use crate::classify::Classify;
    use crate::predicate::predicate_fn;
    use std::fmt;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio_util::sync::CancellationToken;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum TestError {
        Blip,
        Forbidden,
    }

    impl fmt::Display for TestError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                TestError::Blip => f.write_str("connection reset"),
                TestError::Forbidden => f.write_str("forbidden"),
            }
        }
    }

    impl Classify for TestError {
        fn severity(&self) -> Severity {
            match self {
                TestError::Blip => Severity::Transient,
                TestError::Forbidden => Severity::Fatal,
            }
        }
    }

    /// Predicate that replays `script` and counts its invocations.
    /// Once the script is exhausted it keeps reporting not-yet.
    fn scripted(
        script: Vec<Result<Check, TestError>>,
        calls: Arc<AtomicU32>,
    ) -> impl Predicate<Error = TestError> {
        let script = Arc::new(Mutex::new(script.into_iter()));
        predicate_fn(move || {
            let script = Arc::clone(&script);
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                script.lock().unwrap().next().unwrap_or(Ok(Check::NotYet))
            }
        })
    }

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[tokio::test(start_paused = true)]
    async fn test_satisfied_on_fourth_tick() {
        let calls = Arc::new(AtomicU32::new(0));
        let predicate = scripted(
            vec![Ok(Check::NotYet), Ok(Check::NotYet), Ok(Check::NotYet), Ok(Check::Satisfied)],
            calls.clone(),
        );
        let spec = PollSpec::new(secs(1), secs(5), predicate).unwrap();

        let started = Instant::now();
        let outcome = wait(spec, &Never).await;

        assert_eq!(outcome, Outcome::Satisfied);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(started.elapsed(), secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_on_third_tick() {
        let calls = Arc::new(AtomicU32::new(0));
        let spec = PollSpec::new(secs(1), secs(3), scripted(vec![], calls.clone())).unwrap();

        let events = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&events);
        let poller = Poller::with_sink(move |event: &ProgressEvent| {
            recorded.lock().unwrap().push(event.attempt);
        });

        let started = Instant::now();
        let outcome = poller.wait(spec, &Never).await;

        assert_eq!(outcome, Outcome::TimedOut);
        assert_eq!(started.elapsed(), secs(3));
        // Ticks 1 and 2 observe, tick 3 hits the deadline before observing
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(*events.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_shorter_than_interval_never_observes() {
        let calls = Arc::new(AtomicU32::new(0));
        let spec = PollSpec::new(
            secs(10),
            secs(2),
            scripted(vec![Ok(Check::Satisfied)], calls.clone()),
        )
        .unwrap();

        let started = Instant::now();
        let outcome = wait(spec, &Never).await;

        assert_eq!(outcome, Outcome::TimedOut);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        // Returns at the deadline, not at the first tick
        assert_eq!(started.elapsed(), secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_before_first_tick_wins_over_satisfied() {
        let calls = Arc::new(AtomicU32::new(0));
        let spec = PollSpec::new(
            secs(1),
            secs(5),
            scripted(vec![Ok(Check::Satisfied)], calls.clone()),
        )
        .unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcome = wait(spec, &cancel).await;

        assert_eq!(outcome, Outcome::Cancelled);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_detected_at_next_tick_boundary() {
        let calls = Arc::new(AtomicU32::new(0));
        let spec = PollSpec::new(secs(2), secs(10), scripted(vec![], calls.clone())).unwrap();

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            time::sleep(Duration::from_millis(1500)).await;
            trigger.cancel();
        });

        let started = Instant::now();
        let outcome = wait(spec, &cancel).await;

        assert_eq!(outcome, Outcome::Cancelled);
        assert_eq!(started.elapsed(), secs(2), "Cancellation should surface at t=2s, not t=1.5s");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fatal_error_stops_ticking() {
        let calls = Arc::new(AtomicU32::new(0));
        let spec = PollSpec::new(
            secs(1),
            secs(30),
            scripted(
                vec![Ok(Check::NotYet), Err(TestError::Forbidden), Ok(Check::Satisfied)],
                calls.clone(),
            ),
        )
        .unwrap();

        let started = Instant::now();
        let outcome = wait(spec, &Never).await;

        assert_eq!(outcome, Outcome::ObservationFailed(TestError::Forbidden));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(started.elapsed(), secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_errors_are_retried_until_deadline() {
        let calls = Arc::new(AtomicU32::new(0));
        let script = std::iter::repeat_with(|| Err(TestError::Blip)).take(100).collect();
        let spec = PollSpec::new(secs(2), secs(9), scripted(script, calls.clone())).unwrap();

        let events = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&events);
        let poller = Poller::with_sink(move |event: &ProgressEvent| {
            recorded.lock().unwrap().push(event.last.clone());
        });

        let outcome = poller.wait(spec, &Never).await;

        assert_eq!(outcome, Outcome::TimedOut);
        // floor(9 / 2) = 4 observations at t=2,4,6,8; deadline at t=9
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        let events = events.lock().unwrap();
        assert_eq!(events.len(), 4);
        assert!(events
            .iter()
            .all(|last| *last == LastObservation::TransientError("connection reset".to_string())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_then_satisfied() {
        let calls = Arc::new(AtomicU32::new(0));
        let spec = PollSpec::new(
            secs(1),
            secs(10),
            scripted(vec![Err(TestError::Blip), Err(TestError::Blip), Ok(Check::Satisfied)], calls.clone()),
        )
        .unwrap();

        let outcome = wait(spec, &Never).await;

        assert_eq!(outcome, Outcome::Satisfied);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_classifier_override_makes_transient_fatal() {
        let calls = Arc::new(AtomicU32::new(0));
        let spec = PollSpec::new(secs(1), secs(10), scripted(vec![Err(TestError::Blip)], calls.clone()))
            .unwrap()
            .with_classifier(|_| Severity::Fatal);

        let outcome = wait(spec, &Never).await;

        assert_eq!(outcome, Outcome::ObservationFailed(TestError::Blip));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbounded_timeout_does_not_overflow() {
        let calls = Arc::new(AtomicU32::new(0));
        let spec = PollSpec::new(
            secs(1),
            Duration::MAX,
            scripted(vec![Ok(Check::NotYet), Ok(Check::Satisfied)], calls.clone()),
        )
        .unwrap();

        let started = Instant::now();
        let outcome = wait(spec, &Never).await;

        assert_eq!(outcome, Outcome::Satisfied);
        assert_eq!(started.elapsed(), secs(2));

        let spec = PollSpec::new(secs(1), Duration::from_secs(u64::MAX), scripted(vec![Ok(Check::Satisfied)], calls.clone()))
            .unwrap();
        assert_eq!(wait(spec, &Never).await, Outcome::Satisfied);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbounded_interval_times_out_at_deadline() {
        let calls = Arc::new(AtomicU32::new(0));
        let spec = PollSpec::new(Duration::MAX, secs(5), scripted(vec![Ok(Check::Satisfied)], calls.clone())).unwrap();

        let started = Instant::now();
        let outcome = wait(spec, &Never).await;

        assert_eq!(outcome, Outcome::TimedOut);
        assert_eq!(started.elapsed(), secs(5));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicking_sink_does_not_change_outcome() {
        let calls = Arc::new(AtomicU32::new(0));
        let spec = PollSpec::new(
            secs(1),
            secs(10),
            scripted(vec![Ok(Check::NotYet), Err(TestError::Blip), Ok(Check::Satisfied)], calls.clone()),
        )
        .unwrap();
        let poller = Poller::with_sink(|_: &ProgressEvent| panic!("sink exploded"));

        let outcome = poller.wait(spec, &Never).await;

        assert_eq!(outcome, Outcome::Satisfied);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overrun_tick_counts_toward_deadline() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        // Each observation takes 3s against a 1s interval
        let predicate = predicate_fn(move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                time::sleep(secs(3)).await;
                Ok::<_, TestError>(Check::NotYet)
            }
        });
        let spec = PollSpec::new(secs(1), secs(5), predicate).unwrap();

        let started = Instant::now();
        let outcome = wait(spec, &Never).await;

        assert_eq!(outcome, Outcome::TimedOut);
        // Observations start at t=1 and t=4; the wake at t=7 is past the deadline
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(started.elapsed() >= secs(5));
    }
}
