//! # Diagnostic Report
//!
//! Gathers the objects a support bundle needs and runs each one through a
//! [`RedactionTable`] before anything is serialized.

use crate::error::TrustError;
use crate::observability::metrics;
use crate::redaction::{ExportObject, RedactionPolicy, RedactionTable};
use crate::store::ObjectReader;
use chrono::{DateTime, Utc};
use k8s_openapi::api::admissionregistration::v1::{
    MutatingWebhookConfiguration, ValidatingWebhookConfiguration,
};
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use serde::Serialize;
use tracing::info;

/// Redacted objects collected for one namespace
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticReport {
    pub generated_at: DateTime<Utc>,
    pub namespace: String,
    pub objects: Vec<ExportObject>,
}

#[derive(Debug)]
pub struct ReportCollector<'a, S> {
    store: &'a S,
    table: RedactionTable,
}

impl<'a, S> ReportCollector<'a, S>
where
    S: ObjectReader<Secret>
        + ObjectReader<ConfigMap>
        + ObjectReader<MutatingWebhookConfiguration>
        + ObjectReader<ValidatingWebhookConfiguration>,
{
    pub fn new(store: &'a S, table: RedactionTable) -> Self {
        Self { store, table }
    }

    /// Secrets and ConfigMaps of `namespace` plus every webhook configuration in the cluster
    pub async fn collect(&self, namespace: &str) -> Result<DiagnosticReport, TrustError> {
        let mut collected = Vec::new();
        collected.extend(
            ObjectReader::<Secret>::list(self.store, Some(namespace))
                .await?
                .into_iter()
                .map(ExportObject::from),
        );
        collected.extend(
            ObjectReader::<ConfigMap>::list(self.store, Some(namespace))
                .await?
                .into_iter()
                .map(ExportObject::from),
        );
        collected.extend(
            ObjectReader::<MutatingWebhookConfiguration>::list(self.store, None)
                .await?
                .into_iter()
                .map(ExportObject::from),
        );
        collected.extend(
            ObjectReader::<ValidatingWebhookConfiguration>::list(self.store, None)
                .await?
                .into_iter()
                .map(ExportObject::from),
        );

        let objects: Vec<ExportObject> = collected.iter().map(|o| self.export(o)).collect();
        info!(
            "Collected {} objects for diagnostic report in namespace '{}'",
            objects.len(),
            namespace
        );

        Ok(DiagnosticReport {
            generated_at: Utc::now(),
            namespace: namespace.to_string(),
            objects,
        })
    }

    fn export(&self, object: &ExportObject) -> ExportObject {
        let kind = object.kind();
        if self.table.policy(kind) == RedactionPolicy::Redact {
            metrics::increment_redactions(kind.as_str());
        }
        self.table.apply(object)
    }
}
