//! kwait
//!
//! Waits for one Kubernetes object to reach a state, polling at a fixed
//! interval until the condition holds, the timeout elapses, or the wait is
//! interrupted.
//!
//! Exit status:
//! - 0: condition satisfied
//! - 1: the object could not be observed (fatal API error)
//! - 2: timed out
//! - 130: interrupted

mod config;
mod error;
mod progress;
mod wait;

use crate::config::Config;
use crate::error::CliError;
use resource_client::{KindRegistry, KubeResourceClient};
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode, CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if rustls::crypto::ring::default_provider().install_default().is_err() {
        warn!("A rustls crypto provider was already installed");
    }

    // Load configuration from environment variables
    let config = Config::from_env()?;

    let mut registry = KindRegistry::with_builtin_kinds();
    if let Some(custom) = config.custom_kind.clone() {
        info!("Registering kind {} ({})", custom.kind(), custom.api_resource.api_version);
        registry.register(custom);
    }
    let kind = registry.resolve(&config.kind)?.kind().to_string();

    let client = KubeResourceClient::try_default(registry, config.retry_policy.clone()).await?;

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, stopping after the current attempt");
            interrupt.cancel();
        }
    });

    let outcome = wait::run(&config, &kind, Arc::new(client), &cancel).await?;

    Ok(ExitCode::from(wait::exit_status(&outcome)))
}
