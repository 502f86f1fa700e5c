//! # Trust Configuration
//!
//! Well-known identifiers for the webhook secret and webhook configurations.

use std::time::Duration;
use tracing::warn;

/// Identifies the trust anchor and the webhook registrations that must carry it
///
/// All settings have sensible defaults and can be overridden via environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustConfig {
    /// Namespace holding the webhook secret
    pub namespace: String,
    /// Name of the secret generated by the operator
    pub secret_name: String,
    /// Key inside the secret's data holding the CA certificate
    pub ca_key: String,
    /// Name of the operator's MutatingWebhookConfiguration
    pub mutating_configuration_name: String,
    /// Name of the operator's ValidatingWebhookConfiguration
    pub validating_configuration_name: String,
    /// Deadline for one verification pass, never zero
    request_timeout: Duration,
}

impl Default for TrustConfig {
    fn default() -> Self {
        use crate::constants::*;
        Self {
            namespace: DEFAULT_OPERATOR_NAMESPACE.to_string(),
            secret_name: DEFAULT_WEBHOOK_SECRET_NAME.to_string(),
            ca_key: DEFAULT_CA_KEY.to_string(),
            mutating_configuration_name: DEFAULT_MUTATING_WEBHOOK_CONFIGURATION_NAME.to_string(),
            validating_configuration_name: DEFAULT_VALIDATING_WEBHOOK_CONFIGURATION_NAME
                .to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl TrustConfig {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        use crate::constants::*;
        Self {
            namespace: env_var_or_default("POD_NAMESPACE", DEFAULT_OPERATOR_NAMESPACE.to_string()),
            secret_name: env_var_or_default(
                "WEBHOOK_SECRET_NAME",
                DEFAULT_WEBHOOK_SECRET_NAME.to_string(),
            ),
            ca_key: env_var_or_default("WEBHOOK_CA_KEY", DEFAULT_CA_KEY.to_string()),
            mutating_configuration_name: env_var_or_default(
                "MUTATING_WEBHOOK_CONFIGURATION_NAME",
                DEFAULT_MUTATING_WEBHOOK_CONFIGURATION_NAME.to_string(),
            ),
            validating_configuration_name: env_var_or_default(
                "VALIDATING_WEBHOOK_CONFIGURATION_NAME",
                DEFAULT_VALIDATING_WEBHOOK_CONFIGURATION_NAME.to_string(),
            ),
            request_timeout: non_zero_timeout(Duration::from_secs(env_var_or_default(
                "WEBHOOK_REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            ))),
        }
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    #[must_use]
    pub fn with_secret_name(mut self, secret_name: impl Into<String>) -> Self {
        self.secret_name = secret_name.into();
        self
    }

    #[must_use]
    pub fn with_ca_key(mut self, ca_key: impl Into<String>) -> Self {
        self.ca_key = ca_key.into();
        self
    }

    #[must_use]
    pub fn with_mutating_configuration_name(mut self, name: impl Into<String>) -> Self {
        self.mutating_configuration_name = name.into();
        self
    }

    #[must_use]
    pub fn with_validating_configuration_name(mut self, name: impl Into<String>) -> Self {
        self.validating_configuration_name = name.into();
        self
    }

    #[must_use]
    /// A zero timeout falls back to the default
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = non_zero_timeout(timeout);
        self
    }

    /// Deadline applied by [`crate::verifier::TrustVerifier::verify_ready`]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

/// A zero deadline would cancel every verification before its first request
fn non_zero_timeout(timeout: Duration) -> Duration {
    if timeout.is_zero() {
        let default = Duration::from_secs(crate::constants::DEFAULT_REQUEST_TIMEOUT_SECS);
        warn!(
            "Request timeout of zero is not usable, using {}s",
            default.as_secs()
        );
        default
    } else {
        timeout
    }
}

/// Read environment variable or return default value
fn env_var_or_default<T: std::str::FromStr>(key: &str, default: T) -> T
where
    <T as std::str::FromStr>::Err: std::fmt::Debug,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
