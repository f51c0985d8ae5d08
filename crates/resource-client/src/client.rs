//! Kubernetes resource client
//!
//! Fetches objects of any registered kind through the dynamic API, so no
//! object schema is compiled in beyond the kind registry.

use crate::error::ResourceError;
use crate::policy::RetryPolicy;
use crate::registry::KindRegistry;
use crate::resource::Resource;
use crate::resource_trait::ResourceClientTrait;
use kube::api::{Api, DynamicObject};
use kube::Client;
use tracing::debug;

/// Default namespace when the caller does not name one
pub const DEFAULT_NAMESPACE: &str = "default";

/// Resource client backed by the Kubernetes API
pub struct KubeResourceClient {
    client: Client,
    registry: KindRegistry,
    policy: RetryPolicy,
}

impl std::fmt::Debug for KubeResourceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeResourceClient")
            .field("registry", &self.registry)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl KubeResourceClient {
    /// Create a client from an existing kube client
    ///
    /// # Arguments
    /// * `client` - Connected kube client
    /// * `registry` - Kinds this client may look up
    /// * `policy` - Classification of API failures
    pub fn new(client: Client, registry: KindRegistry, policy: RetryPolicy) -> Self {
        Self {
            client,
            registry,
            policy,
        }
    }

    /// Create a client from the ambient configuration (in-cluster service
    /// account or `$KUBECONFIG`)
    ///
    /// # Errors
    /// Returns [`ResourceError`] when no configuration can be inferred or the
    /// client cannot be built; classified with `policy`.
    pub async fn try_default(registry: KindRegistry, policy: RetryPolicy) -> Result<Self, ResourceError> {
        let client = Client::try_default()
            .await
            .map_err(|e| policy.classify_kube_error(&e, "connecting to the Kubernetes API"))?;
        Ok(Self::new(client, registry, policy))
    }
}

#[async_trait::async_trait]
impl ResourceClientTrait for KubeResourceClient {
    async fn fetch_by_name(&self, kind: &str, namespace: Option<&str>, name: &str) -> Result<Resource, ResourceError> {
        let info = self.registry.resolve(kind)?;

        let (api, namespace): (Api<DynamicObject>, Option<String>) = if info.namespaced {
            let ns = namespace.unwrap_or(DEFAULT_NAMESPACE);
            (
                Api::namespaced_with(self.client.clone(), ns, &info.api_resource),
                Some(ns.to_string()),
            )
        } else {
            (Api::all_with(self.client.clone(), &info.api_resource), None)
        };

        let context = match &namespace {
            Some(ns) => format!("{} {}/{}", info.kind(), ns, name),
            None => format!("{} {}", info.kind(), name),
        };
        debug!("Fetching {}", context);

        let object = api
            .get(name)
            .await
            .map_err(|e| self.policy.classify_kube_error(&e, &context))?;

        Ok(Resource {
            kind: info.kind().to_string(),
            namespace,
            name: name.to_string(),
            deleting: object.metadata.deletion_timestamp.is_some(),
            body: object.data,
        })
    }
}
