//! # Webhook Config Updater
//!
//! Writes an edited webhook configuration back with a full-object replace.
//! No merge or patch: last writer wins, and the caller supplies the resource
//! version that guards against clobbering concurrent changes.

use super::AdmissionWebhookConfiguration;
use crate::error::TrustError;
use crate::observability::metrics;
use crate::store::ObjectWriter;
use tracing::{info, Instrument};

/// Replace `configuration` in the cluster and return the stored object
pub async fn update_webhook_configuration<C, S>(
    store: &S,
    configuration: &C,
) -> Result<C, TrustError>
where
    C: AdmissionWebhookConfiguration,
    S: ObjectWriter<C> + ?Sized,
{
    let kind = C::kind(&());
    let Some(name) = configuration.meta().name.as_deref() else {
        return Err(TrustError::MissingName {
            kind: kind.to_string(),
        });
    };

    let span = tracing::info_span!(
        "webhook_trust.update",
        resource.kind = %kind,
        resource.name = name,
    );

    let updated = store.replace(configuration).instrument(span).await?;
    metrics::increment_webhook_updates();
    info!(
        "Updated {} '{}' (resourceVersion={})",
        kind,
        name,
        updated.meta().resource_version.as_deref().unwrap_or("unknown")
    );
    Ok(updated)
}
