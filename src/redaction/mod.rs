//! # Redaction Engine
//!
//! Produces safe-to-export copies of sensitive objects for diagnostic reports.
//!
//! For every redacted object the key set of each key-value payload is preserved
//! exactly, every value becomes the empty value of its type, and all other fields
//! are copied unchanged. Inputs are borrowed and never modified; callers must
//! export the returned copy, not the original.
//!
//! ## Module Structure
//!
//! - `policy.rs` - Per-kind policy table (`Redact` or `Pass`) and the exportable object variants

mod policy;

pub use policy::{ExportObject, RedactionPolicy, RedactionTable, ResourceKind};

use crate::constants::REDACTED_CA_BUNDLE;
use crate::webhook::AdmissionWebhookConfiguration;
use k8s_openapi::api::admissionregistration::v1::WebhookClientConfig;
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use k8s_openapi::ByteString;
use std::collections::BTreeMap;

fn empty_values<V, F>(map: Option<&BTreeMap<String, V>>, empty: F) -> Option<BTreeMap<String, V>>
where
    F: Fn() -> V,
{
    map.map(|entries| entries.keys().map(|key| (key.clone(), empty())).collect())
}

/// Copy of `secret` keeping only the keys of `data` and `stringData`
pub fn redact_secret(secret: &Secret) -> Secret {
    Secret {
        data: empty_values(secret.data.as_ref(), || ByteString(Vec::new())),
        string_data: empty_values(secret.string_data.as_ref(), String::new),
        ..secret.clone()
    }
}

/// Copy of `config_map` keeping only the keys of `data` and `binaryData`
pub fn redact_config_map(config_map: &ConfigMap) -> ConfigMap {
    ConfigMap {
        data: empty_values(config_map.data.as_ref(), String::new),
        binary_data: empty_values(config_map.binary_data.as_ref(), || ByteString(Vec::new())),
        ..config_map.clone()
    }
}

/// Copy of `config` with a non-empty CA bundle replaced by `-` (Base64 `LQ==`)
///
/// An empty or absent CA bundle tells the API server to use its own trust roots.
/// Filling it in would change what the export describes, so it is left alone.
pub fn redact_webhook_client_config(config: &WebhookClientConfig) -> WebhookClientConfig {
    let mut redacted = config.clone();
    if redacted.ca_bundle.as_ref().is_some_and(|bundle| !bundle.0.is_empty()) {
        redacted.ca_bundle = Some(ByteString(REDACTED_CA_BUNDLE.to_vec()));
    }
    redacted
}

/// Copy of a mutating or validating configuration with every entry's client config redacted
pub fn redact_webhook_configuration<C: AdmissionWebhookConfiguration>(configuration: &C) -> C {
    let mut redacted = configuration.clone();
    let count = redacted.entries().len();
    for index in 0..count {
        if let Some(entry) = redacted.entry_mut(index) {
            *entry.client_config = redact_webhook_client_config(entry.client_config);
        }
    }
    redacted
}
