//! # Metrics Module
//!
//! Prometheus metrics, organized by responsibility.
//!
//! ## Sub-modules
//!
//! - `registry` - Metrics registry setup and registration
//! - `trust_metrics` - Verification outcomes, redactions and webhook updates

pub mod registry;
pub mod trust_metrics;

pub use registry::*;
pub use trust_metrics::*;
