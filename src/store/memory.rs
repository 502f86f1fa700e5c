//! # In-Memory Store
//!
//! Keeps objects in process memory behind `tokio::sync::RwLock`s. Used by test
//! harnesses that need the verifier and updater without an API server.

use super::{display_name, ObjectReader, ObjectWriter};
use crate::error::TrustError;
use async_trait::async_trait;
use k8s_openapi::api::admissionregistration::v1::{
    MutatingWebhookConfiguration, ValidatingWebhookConfiguration,
};
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use kube::Resource;
use tokio::sync::RwLock;

/// Object store holding every kind the crate reads or writes
#[derive(Debug, Default)]
pub struct InMemoryStore {
    secrets: RwLock<Vec<Secret>>,
    config_maps: RwLock<Vec<ConfigMap>>,
    mutating: RwLock<Vec<MutatingWebhookConfiguration>>,
    validating: RwLock<Vec<ValidatingWebhookConfiguration>>,
}

/// Kinds the [`InMemoryStore`] has a slot for
pub trait StoredKind: Resource<DynamicType = ()> + Clone + Send + Sync + 'static {
    fn slot(store: &InMemoryStore) -> &RwLock<Vec<Self>>;
    fn slot_mut(store: &mut InMemoryStore) -> &mut RwLock<Vec<Self>>;
}

impl StoredKind for Secret {
    fn slot(store: &InMemoryStore) -> &RwLock<Vec<Self>> {
        &store.secrets
    }
    fn slot_mut(store: &mut InMemoryStore) -> &mut RwLock<Vec<Self>> {
        &mut store.secrets
    }
}

impl StoredKind for ConfigMap {
    fn slot(store: &InMemoryStore) -> &RwLock<Vec<Self>> {
        &store.config_maps
    }
    fn slot_mut(store: &mut InMemoryStore) -> &mut RwLock<Vec<Self>> {
        &mut store.config_maps
    }
}

impl StoredKind for MutatingWebhookConfiguration {
    fn slot(store: &InMemoryStore) -> &RwLock<Vec<Self>> {
        &store.mutating
    }
    fn slot_mut(store: &mut InMemoryStore) -> &mut RwLock<Vec<Self>> {
        &mut store.mutating
    }
}

impl StoredKind for ValidatingWebhookConfiguration {
    fn slot(store: &InMemoryStore) -> &RwLock<Vec<Self>> {
        &store.validating
    }
    fn slot_mut(store: &mut InMemoryStore) -> &mut RwLock<Vec<Self>> {
        &mut store.validating
    }
}

fn matches<K: Resource>(object: &K, namespace: Option<&str>, name: &str) -> bool {
    let meta = object.meta();
    meta.name.as_deref() == Some(name)
        && (namespace.is_none() || meta.namespace.as_deref() == namespace)
}

fn same_identity<K: Resource>(a: &K, b: &K) -> bool {
    a.meta().name == b.meta().name && a.meta().namespace == b.meta().namespace
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object while building the store; list order is insertion order
    #[must_use]
    pub fn with<K: StoredKind>(mut self, object: K) -> Self {
        K::slot_mut(&mut self).get_mut().push(object);
        self
    }

    /// Insert or overwrite an object, keeping its list position when it already exists
    pub async fn insert<K: StoredKind>(&self, object: K) {
        let mut objects = K::slot(self).write().await;
        match objects.iter_mut().find(|o| same_identity(*o, &object)) {
            Some(existing) => *existing = object,
            None => objects.push(object),
        }
    }

    pub async fn remove<K: StoredKind>(&self, namespace: Option<&str>, name: &str) -> Option<K> {
        let mut objects = K::slot(self).write().await;
        let index = objects.iter().position(|o| matches(o, namespace, name))?;
        Some(objects.remove(index))
    }
}

#[async_trait]
impl<K: StoredKind> ObjectReader<K> for InMemoryStore {
    async fn get(&self, namespace: Option<&str>, name: &str) -> Result<K, TrustError> {
        K::slot(self)
            .read()
            .await
            .iter()
            .find(|o| matches(*o, namespace, name))
            .cloned()
            .ok_or_else(|| TrustError::not_found(K::kind(&()), display_name(namespace, name)))
    }

    async fn list(&self, namespace: Option<&str>) -> Result<Vec<K>, TrustError> {
        Ok(K::slot(self)
            .read()
            .await
            .iter()
            .filter(|o| namespace.is_none() || o.meta().namespace.as_deref() == namespace)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl<K: StoredKind> ObjectWriter<K> for InMemoryStore {
    async fn replace(&self, object: &K) -> Result<K, TrustError> {
        let name = object
            .meta()
            .name
            .clone()
            .ok_or_else(|| TrustError::MissingName {
                kind: K::kind(&()).to_string(),
            })?;
        let mut objects = K::slot(self).write().await;
        let existing = objects
            .iter_mut()
            .find(|o| same_identity(*o, object))
            .ok_or_else(|| {
                TrustError::not_found(
                    K::kind(&()),
                    display_name(object.meta().namespace.as_deref(), &name),
                )
            })?;

        let next_version = existing
            .meta()
            .resource_version
            .as_deref()
            .and_then(|v| v.parse::<u64>().ok())
            .map_or(1, |v| v + 1);

        let mut stored = object.clone();
        stored.meta_mut().resource_version = Some(next_version.to_string());
        *existing = stored.clone();
        Ok(stored)
    }
}
