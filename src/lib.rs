//! # Webhook Trust
//!
//! Trust-consistency checks and diagnostic redaction for an operator that
//! manages its own admission webhooks.
//!
//! ## Overview
//!
//! 1. **CA trust verification** - [`verifier::TrustVerifier`] checks that the CA
//!    certificate in the operator's webhook secret is the CA bundle registered on
//!    every entry of its mutating and validating webhook configurations
//! 2. **Webhook lookup and update** - [`webhook::find_webhook`] locates an entry by
//!    name, [`webhook::update_webhook_configuration`] writes an edited
//!    configuration back
//! 3. **Redaction** - [`redaction`] turns Secrets, ConfigMaps and webhook client
//!    configs into safe-to-export copies that keep keys but drop values
//!
//! Cluster access goes through the [`store::ObjectReader`] and
//! [`store::ObjectWriter`] traits, implemented by [`store::KubeStore`] for a live
//! cluster and [`store::InMemoryStore`] for tests.
//!
//! Retry policy is left to the caller: every operation reports its outcome once.

pub mod config;
pub mod constants;
pub mod error;
pub mod observability;
pub mod redaction;
pub mod report;
pub mod store;
pub mod verifier;
pub mod webhook;

pub use config::TrustConfig;
pub use error::TrustError;
pub use verifier::{TrustAnchor, TrustVerifier};
