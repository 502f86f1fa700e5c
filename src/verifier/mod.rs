//! # CA Trust Verifier
//!
//! Checks that the CA certificate in the operator's webhook secret is the CA
//! bundle registered on every entry of the operator's mutating and validating
//! webhook configurations.
//!
//! The operator regenerates its secret independently of the webhook
//! registrations it owns, so for a while after a rotation the two can disagree.
//! The verifier only reads and keeps no state between calls: an external
//! control loop decides how often to call it and when to give up.
//!
//! The secret and the two configurations are fetched one after another, not
//! atomically. A result describes the cluster at roughly one point in time.

mod anchor;

pub use anchor::{render_ca_bytes, TrustAnchor, EMPTY_CA_BUNDLE};

use crate::config::TrustConfig;
use crate::error::TrustError;
use crate::observability::metrics;
use crate::store::{display_name, ObjectReader};
use crate::webhook::AdmissionWebhookConfiguration;
use k8s_openapi::api::admissionregistration::v1::{
    MutatingWebhookConfiguration, ValidatingWebhookConfiguration,
};
use k8s_openapi::api::core::v1::Secret;
use tokio::time::Instant;
use tracing::{debug, info, warn, Instrument};

/// Cross-checks the webhook secret against the operator's webhook registrations
#[derive(Debug)]
pub struct TrustVerifier<S> {
    store: S,
    config: TrustConfig,
}

impl<S> TrustVerifier<S>
where
    S: ObjectReader<Secret>
        + ObjectReader<MutatingWebhookConfiguration>
        + ObjectReader<ValidatingWebhookConfiguration>,
{
    pub fn new(store: S, config: TrustConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &TrustConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Verify within the configured request timeout
    pub async fn verify_ready(&self) -> Result<(), TrustError> {
        // `timeout` saturates to a far-future deadline for huge durations
        let outcome =
            tokio::time::timeout(self.config.request_timeout(), self.traced_check()).await;
        Self::finish(outcome)
    }

    /// Verify, giving up with [`TrustError::Cancelled`] once `deadline` passes
    pub async fn verify_ready_until(&self, deadline: Instant) -> Result<(), TrustError> {
        let outcome = tokio::time::timeout_at(deadline, self.traced_check()).await;
        Self::finish(outcome)
    }

    async fn traced_check(&self) -> Result<(), TrustError> {
        let span = tracing::info_span!(
            "webhook_trust.verify",
            secret = %display_name(Some(&self.config.namespace), &self.config.secret_name),
            mutating = %self.config.mutating_configuration_name,
            validating = %self.config.validating_configuration_name,
        );
        self.check().instrument(span).await
    }

    fn finish(
        outcome: Result<Result<(), TrustError>, tokio::time::error::Elapsed>,
    ) -> Result<(), TrustError> {
        let result = outcome.unwrap_or_else(|_elapsed| {
            Err(TrustError::Cancelled {
                operation: "webhook CA verification".to_string(),
            })
        });

        match &result {
            Ok(()) => metrics::increment_verifications("ok"),
            Err(e) => metrics::increment_verifications(e.reason()),
        }
        result
    }

    /// Read the trust anchor from the configured secret key
    pub async fn load_trust_anchor(&self) -> Result<TrustAnchor, TrustError> {
        let namespace = self.config.namespace.as_str();
        let secret =
            ObjectReader::<Secret>::get(&self.store, Some(namespace), &self.config.secret_name)
                .await?;

        TrustAnchor::from_secret(&secret, &self.config.ca_key).ok_or_else(|| {
            TrustError::not_found(
                "Secret key",
                format!(
                    "{}[{}]",
                    display_name(Some(namespace), &self.config.secret_name),
                    self.config.ca_key
                ),
            )
        })
    }

    async fn check(&self) -> Result<(), TrustError> {
        let anchor = self.load_trust_anchor().await?;
        debug!("Loaded trust anchor ({} bytes)", anchor.as_bytes().len());

        let mutating = ObjectReader::<MutatingWebhookConfiguration>::get(
            &self.store,
            None,
            &self.config.mutating_configuration_name,
        )
        .await?;
        self.compare(&anchor, &mutating)?;

        let validating = ObjectReader::<ValidatingWebhookConfiguration>::get(
            &self.store,
            None,
            &self.config.validating_configuration_name,
        )
        .await?;
        self.compare(&anchor, &validating)?;

        info!(
            "✅ Webhook CA bundles match secret '{}'",
            display_name(Some(&self.config.namespace), &self.config.secret_name)
        );
        Ok(())
    }

    fn compare<C: AdmissionWebhookConfiguration>(
        &self,
        anchor: &TrustAnchor,
        configuration: &C,
    ) -> Result<(), TrustError> {
        let kind = C::kind(&());
        for entry in configuration.entries() {
            if !anchor.matches(entry.client_config.ca_bundle.as_ref()) {
                let actual = entry
                    .client_config
                    .ca_bundle
                    .as_ref()
                    .map_or_else(|| render_ca_bytes(&[]), |bundle| render_ca_bytes(&bundle.0));
                warn!(
                    "CA bundle of webhook '{}' in {} '{}' does not match the secret",
                    entry.name,
                    kind,
                    configuration.configuration_name()
                );
                return Err(TrustError::Mismatch {
                    kind: kind.to_string(),
                    configuration: configuration.configuration_name().to_string(),
                    webhook: entry.name.to_string(),
                    secret: display_name(Some(&self.config.namespace), &self.config.secret_name),
                    expected: anchor.render(),
                    actual,
                });
            }
            debug!("Webhook '{}' in {} carries the expected CA", entry.name, kind);
        }
        Ok(())
    }
}
