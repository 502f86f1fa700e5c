//! # Kubernetes Store
//!
//! [`ObjectReader`]/[`ObjectWriter`] on top of `kube::Api`.

use super::{display_name, ObjectReader, ObjectWriter};
use crate::error::TrustError;
use async_trait::async_trait;
use k8s_openapi::api::admissionregistration::v1::{
    MutatingWebhookConfiguration, ValidatingWebhookConfiguration,
};
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use k8s_openapi::NamespaceResourceScope;
use kube::api::{ListParams, PostParams};
use kube::{Api, Client, Resource};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use tracing::debug;

/// Store backed by a live Kubernetes API server
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl Debug for KubeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeStore").finish_non_exhaustive()
    }
}

impl KubeStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Namespaced API, falling back to the client's default namespace
    fn namespaced_api<K>(&self, namespace: Option<&str>) -> Api<K>
    where
        K: Resource<Scope = NamespaceResourceScope>,
        <K as Resource>::DynamicType: Default,
    {
        match namespace {
            Some(ns) => Api::namespaced(self.client.clone(), ns),
            None => Api::default_namespaced(self.client.clone()),
        }
    }

    /// Namespaced API for listing; `None` lists across all namespaces
    fn listing_api<K>(&self, namespace: Option<&str>) -> Api<K>
    where
        K: Resource<Scope = NamespaceResourceScope>,
        <K as Resource>::DynamicType: Default,
    {
        match namespace {
            Some(ns) => Api::namespaced(self.client.clone(), ns),
            None => Api::all(self.client.clone()),
        }
    }

    fn cluster_api<K>(&self) -> Api<K>
    where
        K: Resource,
        <K as Resource>::DynamicType: Default,
    {
        Api::all(self.client.clone())
    }
}

/// 404 becomes [`TrustError::NotFound`], everything else is passed through untouched
fn map_kube_error(kind: &str, name: &str, err: kube::Error) -> TrustError {
    match err {
        kube::Error::Api(api_err) if api_err.code == 404 => TrustError::not_found(kind, name),
        other => TrustError::Transport(other),
    }
}

async fn get_from<K>(api: Api<K>, namespace: Option<&str>, name: &str) -> Result<K, TrustError>
where
    K: Resource<DynamicType = ()> + Clone + DeserializeOwned + Debug,
{
    debug!("Fetching {} '{}'", K::kind(&()), display_name(namespace, name));
    api.get(name)
        .await
        .map_err(|e| map_kube_error(&K::kind(&()), &display_name(namespace, name), e))
}

async fn list_from<K>(api: Api<K>) -> Result<Vec<K>, TrustError>
where
    K: Resource<DynamicType = ()> + Clone + DeserializeOwned + Debug,
{
    api.list(&ListParams::default())
        .await
        .map(|list| list.items)
        .map_err(TrustError::Transport)
}

async fn replace_in<K>(api: Api<K>, object: &K) -> Result<K, TrustError>
where
    K: Resource<DynamicType = ()> + Clone + DeserializeOwned + Serialize + Debug,
{
    let kind = K::kind(&());
    let name = object
        .meta()
        .name
        .as_deref()
        .ok_or_else(|| TrustError::MissingName {
            kind: kind.to_string(),
        })?;
    api.replace(name, &PostParams::default(), object)
        .await
        .map_err(|e| map_kube_error(&kind, name, e))
}

#[async_trait]
impl ObjectReader<Secret> for KubeStore {
    async fn get(&self, namespace: Option<&str>, name: &str) -> Result<Secret, TrustError> {
        get_from(self.namespaced_api(namespace), namespace, name).await
    }

    async fn list(&self, namespace: Option<&str>) -> Result<Vec<Secret>, TrustError> {
        list_from(self.listing_api(namespace)).await
    }
}

#[async_trait]
impl ObjectReader<ConfigMap> for KubeStore {
    async fn get(&self, namespace: Option<&str>, name: &str) -> Result<ConfigMap, TrustError> {
        get_from(self.namespaced_api(namespace), namespace, name).await
    }

    async fn list(&self, namespace: Option<&str>) -> Result<Vec<ConfigMap>, TrustError> {
        list_from(self.listing_api(namespace)).await
    }
}

#[async_trait]
impl ObjectReader<MutatingWebhookConfiguration> for KubeStore {
    async fn get(
        &self,
        _namespace: Option<&str>,
        name: &str,
    ) -> Result<MutatingWebhookConfiguration, TrustError> {
        get_from(self.cluster_api(), None, name).await
    }

    async fn list(
        &self,
        _namespace: Option<&str>,
    ) -> Result<Vec<MutatingWebhookConfiguration>, TrustError> {
        list_from(self.cluster_api()).await
    }
}

#[async_trait]
impl ObjectReader<ValidatingWebhookConfiguration> for KubeStore {
    async fn get(
        &self,
        _namespace: Option<&str>,
        name: &str,
    ) -> Result<ValidatingWebhookConfiguration, TrustError> {
        get_from(self.cluster_api(), None, name).await
    }

    async fn list(
        &self,
        _namespace: Option<&str>,
    ) -> Result<Vec<ValidatingWebhookConfiguration>, TrustError> {
        list_from(self.cluster_api()).await
    }
}

#[async_trait]
impl ObjectWriter<MutatingWebhookConfiguration> for KubeStore {
    async fn replace(
        &self,
        object: &MutatingWebhookConfiguration,
    ) -> Result<MutatingWebhookConfiguration, TrustError> {
        replace_in(self.cluster_api(), object).await
    }
}

#[async_trait]
impl ObjectWriter<ValidatingWebhookConfiguration> for KubeStore {
    async fn replace(
        &self,
        object: &ValidatingWebhookConfiguration,
    ) -> Result<ValidatingWebhookConfiguration, TrustError> {
        replace_in(self.cluster_api(), object).await
    }
}
