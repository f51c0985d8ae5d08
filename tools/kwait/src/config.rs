//! kwait configuration
//!
//! Everything is read from environment variables. Parsing goes through a
//! lookup function so it can be tested without touching the process
//! environment.

use crate::error::CliError;
use resource_client::{Condition, KindInfo, RetryPolicy};
use std::time::Duration;

/// Default overall timeout
const DEFAULT_TIMEOUT_SECS: u64 = 300;
/// Default tick interval
const DEFAULT_INTERVAL_SECS: u64 = 5;

/// Wait configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Kind or alias to look up (e.g. "Service", "svc")
    pub kind: String,
    /// Object name
    pub name: String,
    /// Namespace for namespaced kinds
    pub namespace: String,
    /// State to wait for
    pub condition: Condition,
    /// Overall timeout
    pub timeout: Duration,
    /// Tick interval
    pub interval: Duration,
    /// Registration for a kind outside the built-in set
    pub custom_kind: Option<KindInfo>,
    /// Classification of API failures
    pub retry_policy: RetryPolicy,
    /// Give up as soon as the object is missing
    pub not_found_fatal: bool,
}

impl Config {
    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - KWAIT_KIND (required)
    /// - KWAIT_NAME (required)
    /// - KWAIT_NAMESPACE (optional, default: default)
    /// - KWAIT_FOR (optional, default: exists)
    /// - KWAIT_TIMEOUT_SECS (optional, default: 300)
    /// - KWAIT_INTERVAL_SECS (optional, default: 5)
    /// - KWAIT_API_VERSION (optional, group/version of a custom kind)
    /// - KWAIT_PLURAL (optional, plural of a custom kind)
    /// - KWAIT_CLUSTER_SCOPED (optional, default: false)
    /// - KWAIT_TRANSIENT_CODES (optional, default: 408,429,500,502,503,504)
    /// - KWAIT_NOT_FOUND_FATAL (optional, default: false)
    pub fn from_env() -> Result<Self, CliError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CliError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let kind = var("KWAIT_KIND").ok_or_else(|| {
            CliError::InvalidConfig("KWAIT_KIND environment variable is required".to_string())
        })?;
        let name = var("KWAIT_NAME").ok_or_else(|| {
            CliError::InvalidConfig("KWAIT_NAME environment variable is required".to_string())
        })?;
        let namespace = var("KWAIT_NAMESPACE").unwrap_or_else(|| "default".to_string());

        let condition = match var("KWAIT_FOR") {
            Some(text) => text.parse()?,
            None => Condition::Exists,
        };

        let timeout = parse_secs(var("KWAIT_TIMEOUT_SECS"), "KWAIT_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let interval = parse_secs(var("KWAIT_INTERVAL_SECS"), "KWAIT_INTERVAL_SECS", DEFAULT_INTERVAL_SECS)?;

        let custom_kind = match var("KWAIT_API_VERSION") {
            Some(api_version) => {
                let (group, version) = match api_version.rsplit_once('/') {
                    Some((group, version)) => (group.to_string(), version.to_string()),
                    None => (String::new(), api_version.clone()),
                };
                if version.is_empty() {
                    return Err(CliError::InvalidConfig(format!(
                        "KWAIT_API_VERSION must be <group>/<version> or <version>, got '{api_version}'"
                    )));
                }
                let plural = var("KWAIT_PLURAL").unwrap_or_else(|| format!("{}s", kind.to_ascii_lowercase()));
                let namespaced = !parse_bool(var("KWAIT_CLUSTER_SCOPED"), "KWAIT_CLUSTER_SCOPED")?;
                Some(KindInfo::new(&group, &version, &kind, &plural, namespaced))
            }
            None => None,
        };

        let retry_policy = match var("KWAIT_TRANSIENT_CODES") {
            Some(codes) => RetryPolicy::with_transient_codes(parse_codes(&codes)?),
            None => RetryPolicy::default(),
        };

        let not_found_fatal = parse_bool(var("KWAIT_NOT_FOUND_FATAL"), "KWAIT_NOT_FOUND_FATAL")?;

        Ok(Self {
            kind,
            name,
            namespace,
            condition,
            timeout,
            interval,
            custom_kind,
            retry_policy,
            not_found_fatal,
        })
    }
}

fn parse_secs(value: Option<String>, key: &str, default: u64) -> Result<Duration, CliError> {
    let Some(value) = value else {
        return Ok(Duration::from_secs(default));
    };
    match value.parse::<u64>() {
        Ok(0) => Err(CliError::InvalidConfig(format!(
            "{key} must be a positive number of seconds, got '{value}'"
        ))),
        Err(e) => Err(CliError::InvalidConfig(format!(
            "{key} must be a positive number of seconds, got '{value}': {e}"
        ))),
        Ok(secs) => Ok(Duration::from_secs(secs)),
    }
}

fn parse_bool(value: Option<String>, key: &str) -> Result<bool, CliError> {
    match value.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None | Some("false" | "0" | "no") => Ok(false),
        Some("true" | "1" | "yes") => Ok(true),
        Some(other) => Err(CliError::InvalidConfig(format!("{key} must be true or false, got '{other}'"))),
    }
}

fn parse_codes(codes: &str) -> Result<Vec<u16>, CliError> {
    codes
        .split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(|code| {
            code.parse::<u16>().map_err(|e| {
                CliError::InvalidConfig(format!("KWAIT_TRANSIENT_CODES has an invalid code '{code}': {e}"))
            })
        })
        .collect()
}
