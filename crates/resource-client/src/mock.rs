//! Mock ResourceClient for unit testing
//!
//! This module provides a mock implementation of ResourceClientTrait that can
//! be used in unit tests without requiring a running cluster.

use crate::error::ResourceError;
use crate::resource::Resource;
use crate::resource_trait::ResourceClientTrait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

type Key = (String, Option<String>, String);

fn key(kind: &str, namespace: Option<&str>, name: &str) -> Key {
    (kind.to_ascii_lowercase(), namespace.map(str::to_string), name.to_string())
}

/// Mock ResourceClient for testing
///
/// Stores objects in memory. Scripted responses queued with
/// [`MockResourceClient::push_response`] are returned first, in order, before
/// falling back to the stored objects; a missing object is `NotFound`.
#[derive(Debug, Clone, Default)]
pub struct MockResourceClient {
    objects: Arc<Mutex<HashMap<Key, Resource>>>,
    scripted: Arc<Mutex<HashMap<Key, VecDeque<Result<Resource, ResourceError>>>>>,
    fetches: Arc<Mutex<u32>>,
}

impl MockResourceClient {
    /// Create an empty mock client
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object, replacing any previous one with the same kind, namespace and name
    pub fn insert(&self, resource: Resource) {
        let key = key(&resource.kind, resource.namespace.as_deref(), &resource.name);
        self.objects.lock().unwrap().insert(key, resource);
    }

    /// Remove an object
    pub fn remove(&self, kind: &str, namespace: Option<&str>, name: &str) {
        self.objects.lock().unwrap().remove(&key(kind, namespace, name));
    }

    /// Queue a response for the next fetch of this object
    pub fn push_response(&self, kind: &str, namespace: Option<&str>, name: &str, response: Result<Resource, ResourceError>) {
        self.scripted
            .lock()
            .unwrap()
            .entry(key(kind, namespace, name))
            .or_default()
            .push_back(response);
    }

    /// Number of fetches served so far
    #[must_use]
    pub fn fetch_count(&self) -> u32 {
        *self.fetches.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl ResourceClientTrait for MockResourceClient {
    async fn fetch_by_name(&self, kind: &str, namespace: Option<&str>, name: &str) -> Result<Resource, ResourceError> {
        *self.fetches.lock().unwrap() += 1;

        let key = key(kind, namespace, name);
        if let Some(response) = self.scripted.lock().unwrap().get_mut(&key).and_then(VecDeque::pop_front) {
            return response;
        }

        self.objects
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound(format!("{kind} {name}")))
    }
}
