//! Wiring from configuration to a running wait

use crate::config::Config;
use crate::error::CliError;
use crate::progress::LogProgressSink;
use poller::{Classify, Outcome, PollSpec, Poller, Severity};
use resource_client::{ResourceClientTrait, ResourceError, ResourcePredicate};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Exit status for a finished wait
pub fn exit_status<E>(outcome: &Outcome<E>) -> u8 {
    match outcome {
        Outcome::Satisfied => 0,
        Outcome::ObservationFailed(_) => 1,
        Outcome::TimedOut => 2,
        Outcome::Cancelled => 130,
    }
}

/// Build the poll spec observing `predicate` with the timing from `config`
pub fn build_spec<C>(config: &Config, predicate: ResourcePredicate<C>) -> Result<PollSpec<ResourcePredicate<C>>, CliError>
where
    C: ResourceClientTrait + ?Sized + 'static,
{
    let spec = PollSpec::new(config.interval, config.timeout, predicate)
        .map_err(|e| CliError::InvalidConfig(e.to_string()))?;

    if config.not_found_fatal {
        Ok(spec.with_classifier(|e: &ResourceError| {
            if e.is_not_found() {
                Severity::Fatal
            } else {
                e.severity()
            }
        }))
    } else {
        Ok(spec)
    }
}

/// Run the wait to completion, logging progress
///
/// `kind` is the canonical kind name, used in progress lines.
pub async fn run<C>(
    config: &Config,
    kind: &str,
    client: Arc<C>,
    cancel: &CancellationToken,
) -> Result<Outcome<ResourceError>, CliError>
where
    C: ResourceClientTrait + ?Sized + 'static,
{
    let predicate = ResourcePredicate::new(
        client,
        kind,
        Some(config.namespace.clone()),
        config.name.clone(),
        config.condition.clone(),
    );
    let label = predicate.label();

    info!(
        "Waiting for {} in {} to satisfy '{}' (timeout: {:?}, interval: {:?})",
        label,
        config.namespace,
        predicate.condition(),
        config.timeout,
        config.interval
    );

    let spec = build_spec(config, predicate)?;
    let outcome = Poller::with_sink(LogProgressSink::new(label.clone()))
        .wait(spec, cancel)
        .await;

    info!(outcome = outcome.as_str(), "{}: {}", label, outcome);
    Ok(outcome)
}
