//! # Webhook Locator Integration Tests
//!
//! These tests verify:
//! - Entries are found across configurations with their positional index
//! - Unknown entries are not-found
//! - Mutating and validating lookups do not see each other's entries

mod common;

use common::*;
use k8s_openapi::api::admissionregistration::v1::{
    MutatingWebhookConfiguration, ValidatingWebhookConfiguration,
};
use webhook_trust::store::InMemoryStore;
use webhook_trust::webhook::{find_webhook, AdmissionWebhookConfiguration, WebhookMatch};
use webhook_trust::TrustError;

fn cluster() -> InMemoryStore {
    InMemoryStore::new()
        .with(mutating("first", &[("a", Some(CA)), ("b", Some(CA))]))
        .with(mutating(
            "second",
            &[("c", Some(CA)), ("d", Some(CA)), ("x", Some(OTHER_CA))],
        ))
        .with(validating("validating", &[("v", Some(CA))]))
}

#[tokio::test]
async fn test_find_entry_in_second_configuration() {
    let store = cluster();
    let found: WebhookMatch<MutatingWebhookConfiguration> =
        find_webhook(&store, "x").await.unwrap();

    assert_eq!(found.configuration.configuration_name(), "second");
    assert_eq!(found.index, 2);
    let entry = found.entry().unwrap();
    assert_eq!(entry.name, "x");
    assert_eq!(
        entry.client_config.ca_bundle.as_ref().map(|b| b.0.as_slice()),
        Some(OTHER_CA)
    );
}

#[tokio::test]
async fn test_missing_entry_is_not_found() {
    let store = cluster();
    let result = find_webhook::<MutatingWebhookConfiguration, _>(&store, "y").await;
    match result {
        Err(TrustError::NotFound { kind, name }) => {
            assert_eq!(kind, "MutatingWebhookConfiguration webhook");
            assert_eq!(name, "y");
        }
        other => panic!("Expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_variants_are_searched_separately() {
    let store = cluster();
    assert!(find_webhook::<ValidatingWebhookConfiguration, _>(&store, "x")
        .await
        .is_err());
    let found = find_webhook::<ValidatingWebhookConfiguration, _>(&store, "v")
        .await
        .unwrap();
    assert_eq!(found.configuration.configuration_name(), "validating");
    assert_eq!(found.index, 0);
}

#[tokio::test]
async fn test_editing_match_does_not_touch_store() {
    let store = cluster();
    let mut found: WebhookMatch<MutatingWebhookConfiguration> =
        find_webhook(&store, "a").await.unwrap();
    assert!(found.configuration.set_ca_bundle(found.index, b"edited".to_vec()));

    let again: WebhookMatch<MutatingWebhookConfiguration> =
        find_webhook(&store, "a").await.unwrap();
    assert_eq!(
        again.entry().unwrap().client_config.ca_bundle.as_ref().map(|b| b.0.as_slice()),
        Some(CA)
    );
}
