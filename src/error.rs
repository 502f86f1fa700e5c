//! # Error Types
//!
//! Errors surfaced by the locator, verifier and updater, classified so a
//! caller's retry loop can tell propagation lag from a permanent problem.

use thiserror::Error;

/// Errors returned by the trust verifier, webhook locator and updater
#[derive(Debug, Error)]
pub enum TrustError {
    /// A secret, secret key, webhook entry or webhook configuration does not exist
    #[error("{kind} '{name}' not found")]
    NotFound { kind: String, name: String },

    /// A webhook entry carries a CA bundle different from the trust anchor
    #[error(
        "CA bundle of webhook '{webhook}' in {kind} '{configuration}' does not match secret '{secret}': expected {expected}, found {actual}"
    )]
    Mismatch {
        kind: String,
        configuration: String,
        webhook: String,
        secret: String,
        expected: String,
        actual: String,
    },

    /// The Kubernetes API call itself failed
    #[error("Kubernetes API request failed: {0}")]
    Transport(#[source] kube::Error),

    /// The caller's deadline elapsed before the operation finished
    #[error("{operation} cancelled: deadline exceeded")]
    Cancelled { operation: String },

    /// The object handed to the updater has no `metadata.name`
    #[error("{kind} has no metadata.name, cannot replace it")]
    MissingName { kind: String },
}

impl TrustError {
    pub fn not_found(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Whether a later attempt may succeed without operator intervention
    ///
    /// Mismatches and missing objects are usually propagation lag while the
    /// operator rotates its certificate, so they are transient. Rejected
    /// credentials (401/403) need someone to fix RBAC or the kubeconfig.
    pub fn is_transient(&self) -> bool {
        match self {
            TrustError::MissingName { .. } => false,
            TrustError::Transport(kube::Error::Api(api_err)) => {
                !matches!(api_err.code, 401 | 403)
            }
            _ => true,
        }
    }

    /// Get human-readable reason string for metrics
    pub fn reason(&self) -> &'static str {
        match self {
            TrustError::NotFound { .. } => "not_found",
            TrustError::Mismatch { .. } => "mismatch",
            TrustError::Transport(_) => "transport",
            TrustError::Cancelled { .. } => "cancelled",
            TrustError::MissingName { .. } => "missing_name",
        }
    }
}
