//! Kind registry
//!
//! Maps the kind names an operator types (`Service`, `svc`, `services`) to
//! the API coordinates needed to fetch them. Registration is an explicit step
//! performed by the caller; there is no global registry and nothing is
//! registered at load time.

use crate::error::ResourceError;
use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, ReplicaSet, StatefulSet};
use k8s_openapi::api::batch::v1::Job;
use k8s_openapi::api::core::v1::{
    ConfigMap, Namespace, Node, PersistentVolumeClaim, Pod, Secret, Service,
};
use k8s_openapi::api::networking::v1::Ingress;
use k8s_openapi::{ClusterResourceScope, NamespaceResourceScope};
use kube::api::ApiResource;
use kube::core::GroupVersionKind;
use kube::Resource as KubeResource;
use std::collections::HashMap;
use tracing::{debug, warn};

/// API coordinates of one kind.
#[derive(Debug, Clone)]
pub struct KindInfo {
    /// Group, version, kind and plural
    pub api_resource: ApiResource,
    /// Whether objects of this kind live in a namespace
    pub namespaced: bool,
    /// Extra lookup names (e.g. "svc")
    pub short_names: Vec<String>,
}

impl KindInfo {
    /// Describe a kind that is not known at compile time (e.g. a CRD)
    ///
    /// # Arguments
    /// * `group` - API group, empty for the core group
    /// * `version` - API version (e.g. "v1")
    /// * `kind` - Kind name (e.g. "Certificate")
    /// * `plural` - Plural resource name used in URLs (e.g. "certificates")
    /// * `namespaced` - Whether objects live in a namespace
    pub fn new(group: &str, version: &str, kind: &str, plural: &str, namespaced: bool) -> Self {
        let gvk = GroupVersionKind::gvk(group, version, kind);
        Self {
            api_resource: ApiResource::from_gvk_with_plural(&gvk, plural),
            namespaced,
            short_names: Vec::new(),
        }
    }

    /// Describe a namespaced kind from its typed definition
    #[must_use]
    pub fn namespaced<K>() -> Self
    where
        K: KubeResource<DynamicType = (), Scope = NamespaceResourceScope>,
    {
        Self {
            api_resource: ApiResource::erase::<K>(&()),
            namespaced: true,
            short_names: Vec::new(),
        }
    }

    /// Describe a cluster-scoped kind from its typed definition
    #[must_use]
    pub fn cluster<K>() -> Self
    where
        K: KubeResource<DynamicType = (), Scope = ClusterResourceScope>,
    {
        Self {
            api_resource: ApiResource::erase::<K>(&()),
            namespaced: false,
            short_names: Vec::new(),
        }
    }

    /// Add short names accepted on lookup
    #[must_use]
    pub fn with_short_names(mut self, names: &[&str]) -> Self {
        self.short_names.extend(names.iter().map(|n| (*n).to_string()));
        self
    }

    /// Kind name
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.api_resource.kind
    }

    fn lookup_names(&self) -> impl Iterator<Item = String> + '_ {
        [self.api_resource.kind.as_str(), self.api_resource.plural.as_str()]
            .into_iter()
            .chain(self.short_names.iter().map(String::as_str))
            .map(str::to_ascii_lowercase)
    }
}

/// Registry of kinds available for lookup by name.
#[derive(Debug, Clone, Default)]
pub struct KindRegistry {
    kinds: Vec<KindInfo>,
    index: HashMap<String, usize>,
}

impl KindRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in workload, config and network kinds
    #[must_use]
    pub fn with_builtin_kinds() -> Self {
        let mut registry = Self::new();
        registry.register_builtin_kinds();
        registry
    }

    /// Register the built-in kinds
    pub fn register_builtin_kinds(&mut self) {
        // Core
        self.register(KindInfo::namespaced::<Pod>().with_short_names(&["po"]));
        self.register(KindInfo::namespaced::<Service>().with_short_names(&["svc"]));
        self.register(KindInfo::namespaced::<ConfigMap>().with_short_names(&["cm"]));
        self.register(KindInfo::namespaced::<Secret>());
        self.register(KindInfo::namespaced::<PersistentVolumeClaim>().with_short_names(&["pvc"]));
        self.register(KindInfo::cluster::<Namespace>().with_short_names(&["ns"]));
        self.register(KindInfo::cluster::<Node>().with_short_names(&["no"]));
        // Apps
        self.register(KindInfo::namespaced::<Deployment>().with_short_names(&["deploy"]));
        self.register(KindInfo::namespaced::<StatefulSet>().with_short_names(&["sts"]));
        self.register(KindInfo::namespaced::<DaemonSet>().with_short_names(&["ds"]));
        self.register(KindInfo::namespaced::<ReplicaSet>().with_short_names(&["rs"]));
        // Batch
        self.register(KindInfo::namespaced::<Job>());
        // Networking
        self.register(KindInfo::namespaced::<Ingress>().with_short_names(&["ing"]));
    }

    /// Register a kind under its kind name, plural and short names
    ///
    /// Lookup names are case-insensitive. A name already taken by another
    /// kind is reassigned to the new one.
    pub fn register(&mut self, info: KindInfo) {
        let position = self.kinds.len();
        for name in info.lookup_names() {
            if let Some(previous) = self.index.insert(name.clone(), position) {
                warn!(
                    "Kind name '{}' reassigned from {} to {}",
                    name,
                    self.kinds[previous].kind(),
                    info.kind()
                );
            }
        }
        debug!(
            "Registered kind {} ({}, plural: {})",
            info.kind(),
            info.api_resource.api_version,
            info.api_resource.plural
        );
        self.kinds.push(info);
    }

    /// Look up a kind by kind name, plural or short name
    ///
    /// # Errors
    /// Returns [`ResourceError::UnknownKind`] when nothing is registered under `name`.
    pub fn resolve(&self, name: &str) -> Result<&KindInfo, ResourceError> {
        self.index
            .get(&name.to_ascii_lowercase())
            .map(|&position| &self.kinds[position])
            .ok_or_else(|| ResourceError::UnknownKind(name.to_string()))
    }

    /// Number of registered kinds
    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Returns true when nothing is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
