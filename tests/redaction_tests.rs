//! # Redaction Integration Tests
//!
//! These tests verify:
//! - No sensitive payload survives redaction, raw or Base64-encoded
//! - Key sets are preserved exactly
//! - The diagnostic report only ever contains redacted copies unless a kind is set to pass

mod common;

use base64::Engine;
use common::*;
use k8s_openapi::api::admissionregistration::v1::WebhookClientConfig;
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use k8s_openapi::ByteString;
use std::collections::BTreeMap;
use webhook_trust::redaction::{
    redact_config_map, redact_secret, redact_webhook_client_config, redact_webhook_configuration,
    ExportObject, RedactionPolicy, RedactionTable, ResourceKind,
};
use webhook_trust::report::ReportCollector;
use webhook_trust::TrustConfig;

const PAYLOADS: &[&[u8]] = &[
    b"correct horse battery staple",
    b"postgres://app:s3cr3t-p4ssw0rd@db:5432/app",
    CA,
    PRIVATE_KEY,
    &[0x00, 0x9f, 0x92, 0x96, 0xff, 0x10, 0x20, 0x30],
];

fn encoded(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Serialized output contains neither the payload nor its Base64 form
fn assert_no_leak(serialized: &str, payload: &[u8]) {
    if let Ok(text) = std::str::from_utf8(payload) {
        assert!(!serialized.contains(text), "raw payload leaked");
    }
    assert!(
        !serialized.contains(&encoded(payload)),
        "base64 payload leaked"
    );
}

fn secret_with(payloads: &[&[u8]]) -> Secret {
    Secret {
        metadata: meta("app-credentials", Some("default")),
        data: Some(
            payloads
                .iter()
                .enumerate()
                .map(|(i, p)| (format!("key-{i}"), ByteString(p.to_vec())))
                .collect(),
        ),
        string_data: Some(
            payloads
                .iter()
                .enumerate()
                .filter_map(|(i, p)| {
                    let text = std::str::from_utf8(p).ok()?;
                    Some((format!("string-{i}"), text.to_string()))
                })
                .collect(),
        ),
        ..Default::default()
    }
}

#[test]
fn test_secret_payloads_never_leak() {
    let secret = secret_with(PAYLOADS);
    let redacted = redact_secret(&secret);
    let serialized = serde_json::to_string(&redacted).unwrap();

    for payload in PAYLOADS {
        assert_no_leak(&serialized, payload);
    }

    assert_eq!(
        redacted.data.as_ref().unwrap().keys().collect::<Vec<_>>(),
        secret.data.as_ref().unwrap().keys().collect::<Vec<_>>()
    );
    assert_eq!(
        redacted.string_data.as_ref().unwrap().keys().collect::<Vec<_>>(),
        secret.string_data.as_ref().unwrap().keys().collect::<Vec<_>>()
    );
}

#[test]
fn test_config_map_payloads_never_leak() {
    let config_map = ConfigMap {
        metadata: meta("app-config", Some("default")),
        data: Some(BTreeMap::from([
            ("dsn".to_string(), "postgres://app:s3cr3t-p4ssw0rd@db:5432/app".to_string()),
            ("token".to_string(), "correct horse battery staple".to_string()),
        ])),
        binary_data: Some(BTreeMap::from([(
            "keystore".to_string(),
            ByteString(PRIVATE_KEY.to_vec()),
        )])),
        ..Default::default()
    };
    let redacted = redact_config_map(&config_map);
    let serialized = serde_json::to_string(&redacted).unwrap();

    for payload in PAYLOADS {
        assert_no_leak(&serialized, payload);
    }
    assert_eq!(redacted.data.unwrap().len(), 2);
    assert_eq!(redacted.binary_data.unwrap().len(), 1);
}

#[test]
fn test_ca_bundle_redacts_to_fixed_marker() {
    for payload in PAYLOADS {
        let config = WebhookClientConfig {
            ca_bundle: Some(ByteString(payload.to_vec())),
            ..Default::default()
        };
        let redacted = redact_webhook_client_config(&config);
        let bundle = redacted.ca_bundle.unwrap();
        assert_eq!(encoded(&bundle.0), "LQ==");
    }
}

#[test]
fn test_webhook_configuration_export_keeps_routing() {
    let configuration = mutating(
        "operator-mutating-webhook-configuration",
        &[("mcluster.example.io", Some(CA)), ("mdefault.example.io", None)],
    );
    let redacted = redact_webhook_configuration(&configuration);
    let serialized = serde_json::to_string(&redacted).unwrap();

    assert_no_leak(&serialized, CA);
    assert!(serialized.contains("\"caBundle\":\"LQ==\""));
    assert!(serialized.contains("webhook-service"));

    let webhooks = redacted.webhooks.unwrap();
    assert!(webhooks[1].client_config.ca_bundle.is_none());
}

#[test]
fn test_export_object_dispatch_matches_direct_functions() {
    let secret = secret_with(PAYLOADS);
    let table = RedactionTable::default();
    assert_eq!(
        table.apply(&ExportObject::from(secret.clone())),
        ExportObject::Secret(redact_secret(&secret))
    );
}

#[tokio::test]
async fn test_report_contains_only_redacted_payloads() {
    let config = TrustConfig::default();
    let store = consistent_cluster(&config)
        .with(secret_with(PAYLOADS))
        .with(config_map(
            "operator-system",
            "operator-config",
            &[("password", "correct horse battery staple")],
        ))
        .with(config_map("other", "unrelated", &[("a", "b")]));
    let mut in_namespace = secret_with(PAYLOADS);
    in_namespace.metadata.namespace = Some("operator-system".to_string());
    store.insert(in_namespace).await;

    let report = ReportCollector::new(&store, RedactionTable::default())
        .collect("operator-system")
        .await
        .unwrap();

    // webhook secret + app credentials, one config map, two webhook configurations
    assert_eq!(report.namespace, "operator-system");
    assert_eq!(report.objects.len(), 5);

    let yaml = serde_yaml::to_string(&report).unwrap();
    for payload in PAYLOADS {
        assert_no_leak(&yaml, payload);
    }
    assert!(yaml.contains("tls.crt"));
    assert!(yaml.contains("tls.key"));
    assert!(yaml.contains("LQ=="));
    assert!(!yaml.contains("unrelated"));
}

#[tokio::test]
async fn test_report_can_pass_config_maps() {
    let config = TrustConfig::default();
    let store = consistent_cluster(&config).with(config_map(
        "operator-system",
        "operator-config",
        &[("log_level", "debug")],
    ));
    let table =
        RedactionTable::default().with_policy(ResourceKind::ConfigMap, RedactionPolicy::Pass);

    let report = ReportCollector::new(&store, table)
        .collect("operator-system")
        .await
        .unwrap();

    let config_map = report
        .objects
        .iter()
        .find_map(|object| match object {
            ExportObject::ConfigMap(config_map) => Some(config_map),
            _ => None,
        })
        .unwrap();
    assert_eq!(
        config_map.data.as_ref().unwrap().get("log_level").map(String::as_str),
        Some("debug")
    );

    let secret = report
        .objects
        .iter()
        .find_map(|object| match object {
            ExportObject::Secret(secret) => Some(secret),
            _ => None,
        })
        .unwrap();
    assert!(secret.data.as_ref().unwrap().values().all(|v| v.0.is_empty()));
}
