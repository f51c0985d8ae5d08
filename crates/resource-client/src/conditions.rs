//! Wait conditions over fetched resources
//!
//! A [`Condition`] says what state to wait for; [`ResourcePredicate`] pairs
//! it with a resource client and a target object so the poll loop can
//! observe it once per tick.

use crate::error::{InvalidCondition, ResourceError};
use crate::resource::Resource;
use crate::resource_trait::ResourceClientTrait;
use poller::{Check, Predicate};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// State to wait for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// The object can be fetched
    Exists,
    /// The object is gone
    Deleted,
    /// `status.loadBalancer.ingress` has an IP or hostname
    ExternalIp,
    /// `status.conditions` has the given type with status "True"
    StatusCondition(String),
    /// `status.phase` equals the given phase
    Phase(String),
}

impl FromStr for Condition {
    type Err = InvalidCondition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let condition = match trimmed.split_once('=') {
            Some(("condition", value)) if !value.is_empty() => Condition::StatusCondition(value.to_string()),
            Some(("phase", value)) if !value.is_empty() => Condition::Phase(value.to_string()),
            Some(_) => return Err(InvalidCondition(s.to_string())),
            None => match trimmed.to_ascii_lowercase().as_str() {
                "exists" | "create" | "created" => Condition::Exists,
                "delete" | "deleted" => Condition::Deleted,
                "external-ip" | "externalip" => Condition::ExternalIp,
                _ => return Err(InvalidCondition(s.to_string())),
            },
        };
        Ok(condition)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Exists => f.write_str("exists"),
            Condition::Deleted => f.write_str("deleted"),
            Condition::ExternalIp => f.write_str("external-ip"),
            Condition::StatusCondition(kind) => write!(f, "condition={kind}"),
            Condition::Phase(phase) => write!(f, "phase={phase}"),
        }
    }
}

impl Condition {
    /// Evaluate the condition against the result of one fetch
    ///
    /// `NotFound` is an answer for `exists` (not yet) and `deleted`
    /// (satisfied); for every other condition it passes through as an error.
    ///
    /// # Errors
    /// Returns the fetch error when it does not answer the condition.
    pub fn evaluate(&self, fetched: Result<Resource, ResourceError>) -> Result<Check, ResourceError> {
        match (self, fetched) {
            (Condition::Exists, Ok(_)) => Ok(Check::Satisfied),
            (Condition::Exists, Err(ResourceError::NotFound(_))) => Ok(Check::NotYet),
            (Condition::Deleted, Ok(resource)) => {
                if resource.deleting {
                    debug!("{} {} is terminating", resource.kind, resource.name);
                }
                Ok(Check::NotYet)
            }
            (Condition::Deleted, Err(ResourceError::NotFound(_))) => Ok(Check::Satisfied),
            (Condition::ExternalIp, Ok(resource)) => Ok(has_external_address(&resource).into()),
            (Condition::StatusCondition(kind), Ok(resource)) => Ok(has_true_condition(&resource, kind).into()),
            (Condition::Phase(phase), Ok(resource)) => Ok(has_phase(&resource, phase).into()),
            (_, Err(e)) => Err(e),
        }
    }
}

fn has_external_address(resource: &Resource) -> bool {
    resource
        .status()
        .and_then(|status| status.pointer("/loadBalancer/ingress"))
        .and_then(Value::as_array)
        .is_some_and(|ingress| {
            ingress.iter().any(|entry| {
                ["ip", "hostname"].iter().any(|field| {
                    entry
                        .get(field)
                        .and_then(Value::as_str)
                        .is_some_and(|address| !address.is_empty())
                })
            })
        })
}

fn has_true_condition(resource: &Resource, kind: &str) -> bool {
    resource
        .status()
        .and_then(|status| status.get("conditions"))
        .and_then(Value::as_array)
        .is_some_and(|conditions| {
            conditions.iter().any(|condition| {
                condition
                    .get("type")
                    .and_then(Value::as_str)
                    .is_some_and(|t| t.eq_ignore_ascii_case(kind))
                    && condition.get("status").and_then(Value::as_str) == Some("True")
            })
        })
}

fn has_phase(resource: &Resource, phase: &str) -> bool {
    resource
        .status()
        .and_then(|status| status.get("phase"))
        .and_then(Value::as_str)
        .is_some_and(|current| current.eq_ignore_ascii_case(phase))
}

/// Predicate observing one named object through a resource client.
pub struct ResourcePredicate<C: ?Sized> {
    client: Arc<C>,
    kind: String,
    namespace: Option<String>,
    name: String,
    condition: Condition,
}

impl<C: ?Sized> fmt::Debug for ResourcePredicate<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourcePredicate")
            .field("kind", &self.kind)
            .field("namespace", &self.namespace)
            .field("name", &self.name)
            .field("condition", &self.condition)
            .finish_non_exhaustive()
    }
}

impl<C: ResourceClientTrait + ?Sized> ResourcePredicate<C> {
    /// Create a predicate for the object `kind` `namespace`/`name`
    pub fn new(
        client: Arc<C>,
        kind: impl Into<String>,
        namespace: Option<String>,
        name: impl Into<String>,
        condition: Condition,
    ) -> Self {
        Self {
            client,
            kind: kind.into(),
            namespace,
            name: name.into(),
            condition,
        }
    }

    /// "Kind name" label for progress lines, e.g. "Service my-svc"
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {}", self.kind, self.name)
    }

    /// Condition being waited for
    #[must_use]
    pub fn condition(&self) -> &Condition {
        &self.condition
    }
}

#[async_trait::async_trait]
impl<C: ResourceClientTrait + ?Sized> Predicate for ResourcePredicate<C> {
    type Error = ResourceError;

    async fn check(&mut self) -> Result<Check, ResourceError> {
        let fetched = self
            .client
            .fetch_by_name(&self.kind, self.namespace.as_deref(), &self.name)
            .await;
        self.condition.evaluate(fetched)
    }
}
