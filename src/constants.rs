//! # Constants
//!
//! Default values for the well-known names the verifier reads from the cluster.
//! Every one of them can be overridden through [`crate::config::TrustConfig`].

/// Namespace the operator (and its webhook secret) runs in
pub const DEFAULT_OPERATOR_NAMESPACE: &str = "operator-system";

/// Secret generated by the operator's certificate management
pub const DEFAULT_WEBHOOK_SECRET_NAME: &str = "webhook-server-cert";

/// Key in the secret's data holding the CA certificate
pub const DEFAULT_CA_KEY: &str = "tls.crt";

/// MutatingWebhookConfiguration registered by the operator
pub const DEFAULT_MUTATING_WEBHOOK_CONFIGURATION_NAME: &str =
    "operator-mutating-webhook-configuration";

/// ValidatingWebhookConfiguration registered by the operator
pub const DEFAULT_VALIDATING_WEBHOOK_CONFIGURATION_NAME: &str =
    "operator-validating-webhook-configuration";

/// Upper bound for a single verification pass (seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Replacement written over a non-empty CA bundle on export.
/// Encodes to `LQ==` in Base64.
pub const REDACTED_CA_BUNDLE: &[u8] = b"-";
