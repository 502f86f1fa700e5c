//! # Trust Metrics
//!
//! Counters for verification outcomes, redacted objects and webhook updates.

use crate::observability::metrics::registry::REGISTRY;
use anyhow::Result;
use prometheus::{IntCounter, IntCounterVec};
use std::sync::LazyLock;

static VERIFICATIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "webhook_trust_verifications_total",
            "Total number of webhook CA verifications by result",
        ),
        &["result"],
    )
    .expect("Failed to create VERIFICATIONS_TOTAL metric - this should never happen")
});

static REDACTIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "webhook_trust_redactions_total",
            "Total number of objects redacted for export by kind",
        ),
        &["kind"],
    )
    .expect("Failed to create REDACTIONS_TOTAL metric - this should never happen")
});

static WEBHOOK_UPDATES_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "webhook_trust_webhook_updates_total",
        "Total number of webhook configurations replaced",
    )
    .expect("Failed to create WEBHOOK_UPDATES_TOTAL metric - this should never happen")
});

/// Register trust metrics with the registry
pub(crate) fn register_trust_metrics() -> Result<()> {
    REGISTRY.register(Box::new(VERIFICATIONS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(REDACTIONS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(WEBHOOK_UPDATES_TOTAL.clone()))?;
    Ok(())
}

/// `result` is `ok` or a [`crate::error::TrustError::reason`] label
pub fn increment_verifications(result: &str) {
    VERIFICATIONS_TOTAL.with_label_values(&[result]).inc();
}

/// Only objects whose values were actually redacted; passed-through kinds are not counted
pub fn increment_redactions(kind: &str) {
    REDACTIONS_TOTAL.with_label_values(&[kind]).inc();
}

#[cfg(test)]
pub(crate) fn redactions_total(kind: &str) -> u64 {
    REDACTIONS_TOTAL.with_label_values(&[kind]).get()
}

pub fn increment_webhook_updates() {
    WEBHOOK_UPDATES_TOTAL.inc();
}
