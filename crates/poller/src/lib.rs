//! Bounded Polling Engine
//!
//! Observes asynchronous state changes of remote resources by invoking a
//! caller-supplied predicate on a fixed interval until it is satisfied, the
//! deadline passes, the operator cancels, or the observation fails fatally.
//!
//! # Example
//!
//! ```no_run
//! use poller::{predicate_fn, Check, Outcome, PollSpec, Poller, Severity, Classify};
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//!
//! #[derive(Debug)]
//! struct Unreachable;
//!
//! impl std::fmt::Display for Unreachable {
//!     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
//!         f.write_str("unreachable")
//!     }
//! }
//!
//! impl Classify for Unreachable {
//!     fn severity(&self) -> Severity {
//!         Severity::Transient
//!     }
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let spec = PollSpec::new(
//!     Duration::from_secs(1),
//!     Duration::from_secs(30),
//!     predicate_fn(|| async { Ok::<_, Unreachable>(Check::Satisfied) }),
//! )?;
//!
//! let cancel = CancellationToken::new();
//! match Poller::new().wait(spec, &cancel).await {
//!     Outcome::Satisfied => println!("ready"),
//!     other => println!("gave up: {other}"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Fixed Interval Ticks**: First observation after one interval, never immediately
//! - **Deadline**: Absolute, overrun ticks count against it
//! - **Cooperative Cancellation**: Checked at every tick boundary, before the deadline
//! - **Error Classification**: Transient errors retried until the deadline, fatal errors end the wait
//! - **Composition**: `wait_all` / `wait_any` over independent waits

pub mod cancel;
pub mod classify;
pub mod compose;
pub mod error;
pub mod outcome;
pub mod poller;
pub mod predicate;
pub mod progress;
pub mod spec;

pub use cancel::{CancelSignal, Never};
pub use classify::{Classify, Severity};
pub use compose::{wait_all, wait_any, Settled};
pub use error::PollerError;
pub use outcome::Outcome;
pub use poller::{wait, Poller};
pub use predicate::{predicate_fn, Check, FnPredicate, Predicate};
pub use progress::{LastObservation, NoopSink, ProgressEvent, ProgressSink};
pub use spec::PollSpec;
