//! # Redaction Policy Table
//!
//! Maps each exportable resource kind to a policy. Supporting a new kind means
//! one [`ResourceKind`] variant, one [`ExportObject`] variant, and its entry here.

use super::{redact_config_map, redact_secret, redact_webhook_configuration};
use k8s_openapi::api::admissionregistration::v1::{
    MutatingWebhookConfiguration, ValidatingWebhookConfiguration,
};
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use serde::Serialize;
use std::collections::BTreeMap;

/// What to do with an object before it is exported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RedactionPolicy {
    /// Keep keys, drop values
    #[default]
    Redact,
    /// Export unchanged
    Pass,
}

/// Resource kinds a diagnostic report may contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceKind {
    Secret,
    ConfigMap,
    MutatingWebhookConfiguration,
    ValidatingWebhookConfiguration,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Secret,
        ResourceKind::ConfigMap,
        ResourceKind::MutatingWebhookConfiguration,
        ResourceKind::ValidatingWebhookConfiguration,
    ];

    /// Get human-readable kind string for metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Secret => "secret",
            ResourceKind::ConfigMap => "config_map",
            ResourceKind::MutatingWebhookConfiguration => "mutating_webhook_configuration",
            ResourceKind::ValidatingWebhookConfiguration => "validating_webhook_configuration",
        }
    }
}

/// One object headed for a diagnostic report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExportObject {
    Secret(Secret),
    ConfigMap(ConfigMap),
    MutatingWebhookConfiguration(MutatingWebhookConfiguration),
    ValidatingWebhookConfiguration(ValidatingWebhookConfiguration),
}

impl ExportObject {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ExportObject::Secret(_) => ResourceKind::Secret,
            ExportObject::ConfigMap(_) => ResourceKind::ConfigMap,
            ExportObject::MutatingWebhookConfiguration(_) => {
                ResourceKind::MutatingWebhookConfiguration
            }
            ExportObject::ValidatingWebhookConfiguration(_) => {
                ResourceKind::ValidatingWebhookConfiguration
            }
        }
    }

    /// Redacted copy, dispatched on the variant
    pub fn redacted(&self) -> Self {
        match self {
            ExportObject::Secret(secret) => ExportObject::Secret(redact_secret(secret)),
            ExportObject::ConfigMap(config_map) => {
                ExportObject::ConfigMap(redact_config_map(config_map))
            }
            ExportObject::MutatingWebhookConfiguration(configuration) => {
                ExportObject::MutatingWebhookConfiguration(redact_webhook_configuration(
                    configuration,
                ))
            }
            ExportObject::ValidatingWebhookConfiguration(configuration) => {
                ExportObject::ValidatingWebhookConfiguration(redact_webhook_configuration(
                    configuration,
                ))
            }
        }
    }
}

impl From<Secret> for ExportObject {
    fn from(secret: Secret) -> Self {
        ExportObject::Secret(secret)
    }
}

impl From<ConfigMap> for ExportObject {
    fn from(config_map: ConfigMap) -> Self {
        ExportObject::ConfigMap(config_map)
    }
}

impl From<MutatingWebhookConfiguration> for ExportObject {
    fn from(configuration: MutatingWebhookConfiguration) -> Self {
        ExportObject::MutatingWebhookConfiguration(configuration)
    }
}

impl From<ValidatingWebhookConfiguration> for ExportObject {
    fn from(configuration: ValidatingWebhookConfiguration) -> Self {
        ExportObject::ValidatingWebhookConfiguration(configuration)
    }
}

/// Per-kind policy selection
///
/// Every kind redacts by default. A kind missing from the table also redacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedactionTable {
    policies: BTreeMap<ResourceKind, RedactionPolicy>,
}

impl Default for RedactionTable {
    fn default() -> Self {
        Self {
            policies: ResourceKind::ALL
                .into_iter()
                .map(|kind| (kind, RedactionPolicy::Redact))
                .collect(),
        }
    }
}

impl RedactionTable {
    #[must_use]
    pub fn with_policy(mut self, kind: ResourceKind, policy: RedactionPolicy) -> Self {
        self.policies.insert(kind, policy);
        self
    }

    pub fn policy(&self, kind: ResourceKind) -> RedactionPolicy {
        self.policies.get(&kind).copied().unwrap_or_default()
    }

    /// Run `object` through the policy registered for its kind
    pub fn apply(&self, object: &ExportObject) -> ExportObject {
        match self.policy(object.kind()) {
            RedactionPolicy::Redact => object.redacted(),
            RedactionPolicy::Pass => object.clone(),
        }
    }
}
