//! # Object Store Accessor
//!
//! The narrow slice of the Kubernetes API the verifier, locator and updater need:
//! get by name, list, and full-object replace.
//!
//! ## Module Structure
//!
//! - `kubernetes.rs` - `kube::Client` backed store used against a live cluster
//! - `memory.rs` - In-memory store for test harnesses and dry runs

mod kubernetes;
mod memory;

pub use kubernetes::KubeStore;
pub use memory::{InMemoryStore, StoredKind};

use crate::error::TrustError;
use async_trait::async_trait;

/// Read access to objects of kind `K`
///
/// `namespace` is ignored for cluster-scoped kinds.
#[async_trait]
pub trait ObjectReader<K>: Send + Sync
where
    K: Send + 'static,
{
    /// Fetch a single object, failing with [`TrustError::NotFound`] when absent
    async fn get(&self, namespace: Option<&str>, name: &str) -> Result<K, TrustError>;

    /// List every object visible in `namespace` (all namespaces when `None`)
    async fn list(&self, namespace: Option<&str>) -> Result<Vec<K>, TrustError>;
}

/// Write access to objects of kind `K`
#[async_trait]
pub trait ObjectWriter<K>: Send + Sync
where
    K: Send + Sync + 'static,
{
    /// Replace the whole object, last writer wins
    async fn replace(&self, object: &K) -> Result<K, TrustError>;
}

/// `namespace/name` for namespaced lookups, plain `name` otherwise
pub(crate) fn display_name(namespace: Option<&str>, name: &str) -> String {
    match namespace {
        Some(ns) => format!("{ns}/{name}"),
        None => name.to_string(),
    }
}
