//! # Observability
//!
//! Prometheus metrics for verification, redaction and webhook updates.
//! Logging goes through `tracing`; the binary installs the subscriber.

pub mod metrics;
