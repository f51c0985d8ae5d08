//! Kubernetes Resource Client
//!
//! Name-addressed read access to Kubernetes objects of any registered kind,
//! plus the wait conditions built on top of it.
//!
//! # Example
//!
//! ```no_run
//! use poller::{Outcome, PollSpec, Poller};
//! use resource_client::{Condition, KindRegistry, KubeResourceClient, ResourcePredicate, RetryPolicy};
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Register the kinds this process may look up
//! let registry = KindRegistry::with_builtin_kinds();
//! let client = KubeResourceClient::try_default(registry, RetryPolicy::default()).await?;
//!
//! // Wait for a LoadBalancer Service to get an external address
//! let predicate = ResourcePredicate::new(
//!     Arc::new(client),
//!     "Service",
//!     Some("default".to_string()),
//!     "my-svc",
//!     Condition::ExternalIp,
//! );
//! let spec = PollSpec::new(Duration::from_secs(5), Duration::from_secs(300), predicate)?;
//!
//! let outcome = Poller::new().wait(spec, &CancellationToken::new()).await;
//! assert!(matches!(outcome, Outcome::Satisfied));
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Kind Registry**: Explicit, caller-driven registration of kinds and their aliases
//! - **Retry Policy**: Configurable mapping of API failures to transient / fatal
//! - **Conditions**: exists, deleted, external-ip, status condition, phase
//! - **Mocking**: In-memory `MockResourceClient` behind the `test-util` feature

pub mod client;
pub mod conditions;
pub mod error;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;
pub mod policy;
pub mod registry;
pub mod resource;
#[path = "trait.rs"]
pub mod resource_trait;

pub use client::KubeResourceClient;
pub use conditions::{Condition, ResourcePredicate};
pub use error::{InvalidCondition, ResourceError};
#[cfg(any(test, feature = "test-util"))]
pub use mock::MockResourceClient;
pub use policy::RetryPolicy;
pub use registry::{KindInfo, KindRegistry};
pub use resource::Resource;
pub use resource_trait::ResourceClientTrait;
