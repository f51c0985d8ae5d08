//! Fetched resource snapshot

use serde_json::Value;

/// Schema-agnostic snapshot of one Kubernetes object.
///
/// Only what the wait conditions need is lifted out of the object; the rest
/// stays in `body` as untyped JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    /// Kind as registered (e.g. "Service")
    pub kind: String,
    /// Namespace, `None` for cluster-scoped kinds
    pub namespace: Option<String>,
    /// Object name
    pub name: String,
    /// Set when the object has a deletion timestamp
    pub deleting: bool,
    /// Object fields other than metadata (`spec`, `status`, `data`, ...)
    pub body: Value,
}

impl Resource {
    /// Create a snapshot with the given body
    pub fn new(kind: impl Into<String>, namespace: Option<String>, name: impl Into<String>, body: Value) -> Self {
        Self {
            kind: kind.into(),
            namespace,
            name: name.into(),
            deleting: false,
            body,
        }
    }

    /// Mark the snapshot as being deleted
    #[must_use]
    pub fn deleting(mut self) -> Self {
        self.deleting = true;
        self
    }

    /// The `status` section, if present
    #[must_use]
    pub fn status(&self) -> Option<&Value> {
        self.body.get("status")
    }
}
