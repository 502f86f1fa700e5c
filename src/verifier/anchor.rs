//! # Trust Anchor
//!
//! CA certificate bytes read from the operator's webhook secret.

use base64::Engine;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Rendering used for an empty or absent CA bundle
pub const EMPTY_CA_BUNDLE: &str = "<empty: API server default trust roots>";

/// The authoritative CA bytes, wiped from memory on drop
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct TrustAnchor(Vec<u8>);

impl fmt::Debug for TrustAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TrustAnchor({} bytes)", self.0.len())
    }
}

impl TrustAnchor {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Bytes stored under `key` in the secret's `data`
    pub fn from_secret(secret: &Secret, key: &str) -> Option<Self> {
        secret
            .data
            .as_ref()
            .and_then(|data| data.get(key))
            .map(|value| Self(value.0.clone()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Byte-for-byte comparison; an absent bundle compares as empty
    pub fn matches(&self, ca_bundle: Option<&ByteString>) -> bool {
        self.0.as_slice() == ca_bundle.map_or(&[][..], |bundle| bundle.0.as_slice())
    }

    pub fn render(&self) -> String {
        render_ca_bytes(&self.0)
    }
}

/// Text form of CA bytes for error messages
///
/// PEM is printed as-is, anything that is not UTF-8 as `base64:<...>`.
pub fn render_ca_bytes(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return EMPTY_CA_BUNDLE.to_string();
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => format!(
            "base64:{}",
            base64::engine::general_purpose::STANDARD.encode(bytes)
        ),
    }
}
