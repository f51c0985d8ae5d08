//! ResourceClient trait for mocking
//!
//! This trait abstracts name-addressed resource access so wait conditions can
//! be unit tested against an in-memory client.

use crate::error::ResourceError;
use crate::resource::Resource;

/// Trait for resource lookups by name
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait ResourceClientTrait: Send + Sync {
    /// Fetch one object by kind, namespace and name
    ///
    /// `namespace` is ignored for cluster-scoped kinds. Returns
    /// [`ResourceError::NotFound`] when the object does not exist, and a
    /// transient or fatal error when the lookup itself fails.
    async fn fetch_by_name(&self, kind: &str, namespace: Option<&str>, name: &str) -> Result<Resource, ResourceError>;
}
