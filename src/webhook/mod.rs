//! # Admission Webhook Configurations
//!
//! Mutating and validating webhook configurations share their shape: a named
//! list of entries, each with its own client config and failure policy.
//! [`AdmissionWebhookConfiguration`] lets the locator, verifier and updater be
//! written once for both.
//!
//! ## Module Structure
//!
//! - `locator.rs` - Find a webhook entry by name across configurations
//! - `updater.rs` - Write an edited configuration back to the cluster

mod locator;
mod updater;

pub use locator::{find_webhook, locate, WebhookMatch};
pub use updater::update_webhook_configuration;

use k8s_openapi::api::admissionregistration::v1::{
    MutatingWebhookConfiguration, ValidatingWebhookConfiguration, WebhookClientConfig,
};
use k8s_openapi::ByteString;
use kube::Resource;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Read-only view of one webhook entry
#[derive(Debug, Clone, Copy)]
pub struct WebhookEntry<'a> {
    pub name: &'a str,
    pub client_config: &'a WebhookClientConfig,
    pub failure_policy: Option<&'a str>,
}

/// Mutable view of the fields callers correct on a webhook entry
#[derive(Debug)]
pub struct WebhookEntryMut<'a> {
    pub client_config: &'a mut WebhookClientConfig,
    pub failure_policy: &'a mut Option<String>,
}

/// How the API server treats a call that fails or times out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    Fail,
    Ignore,
}

impl FailurePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailurePolicy::Fail => "Fail",
            FailurePolicy::Ignore => "Ignore",
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Fail" => Ok(FailurePolicy::Fail),
            "Ignore" => Ok(FailurePolicy::Ignore),
            other => Err(format!(
                "Invalid failure policy '{other}'. Expected 'Fail' or 'Ignore'"
            )),
        }
    }
}

/// Common surface of `MutatingWebhookConfiguration` and `ValidatingWebhookConfiguration`
pub trait AdmissionWebhookConfiguration:
    Resource<DynamicType = ()>
    + Clone
    + fmt::Debug
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    /// Entries in list order
    fn entries(&self) -> Vec<WebhookEntry<'_>>;

    /// Entry at `index`, `None` when out of range
    fn entry_mut(&mut self, index: usize) -> Option<WebhookEntryMut<'_>>;

    /// `metadata.name`, empty when unset
    fn configuration_name(&self) -> &str {
        self.meta().name.as_deref().unwrap_or_default()
    }

    /// Point the entry at a new CA bundle. Returns `false` when `index` is out of range.
    fn set_ca_bundle(&mut self, index: usize, ca_bundle: Vec<u8>) -> bool {
        match self.entry_mut(index) {
            Some(entry) => {
                entry.client_config.ca_bundle = Some(ByteString(ca_bundle));
                true
            }
            None => false,
        }
    }

    /// Returns `false` when `index` is out of range.
    fn set_failure_policy(&mut self, index: usize, policy: FailurePolicy) -> bool {
        match self.entry_mut(index) {
            Some(entry) => {
                *entry.failure_policy = Some(policy.as_str().to_string());
                true
            }
            None => false,
        }
    }
}

impl AdmissionWebhookConfiguration for MutatingWebhookConfiguration {
    fn entries(&self) -> Vec<WebhookEntry<'_>> {
        self.webhooks
            .iter()
            .flatten()
            .map(|webhook| WebhookEntry {
                name: &webhook.name,
                client_config: &webhook.client_config,
                failure_policy: webhook.failure_policy.as_deref(),
            })
            .collect()
    }

    fn entry_mut(&mut self, index: usize) -> Option<WebhookEntryMut<'_>> {
        self.webhooks
            .as_mut()?
            .get_mut(index)
            .map(|webhook| WebhookEntryMut {
                client_config: &mut webhook.client_config,
                failure_policy: &mut webhook.failure_policy,
            })
    }
}

impl AdmissionWebhookConfiguration for ValidatingWebhookConfiguration {
    fn entries(&self) -> Vec<WebhookEntry<'_>> {
        self.webhooks
            .iter()
            .flatten()
            .map(|webhook| WebhookEntry {
                name: &webhook.name,
                client_config: &webhook.client_config,
                failure_policy: webhook.failure_policy.as_deref(),
            })
            .collect()
    }

    fn entry_mut(&mut self, index: usize) -> Option<WebhookEntryMut<'_>> {
        self.webhooks
            .as_mut()?
            .get_mut(index)
            .map(|webhook| WebhookEntryMut {
                client_config: &mut webhook.client_config,
                failure_policy: &mut webhook.failure_policy,
            })
    }
}
