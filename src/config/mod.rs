//! # Verifier Configuration
//!
//! Names of the objects the trust verifier cross-checks, loaded from environment
//! variables with defaults from [`crate::constants`].
//!
//! Nothing in the crate reads these names from globals; callers build a
//! [`TrustConfig`] once and hand it to the verifier.

mod trust;

pub use trust::TrustConfig;

/// Load configuration from environment variables with defaults
pub fn load_config() -> TrustConfig {
    TrustConfig::from_env()
}
