//! # Webhook Locator
//!
//! Finds a webhook entry by name across every configuration of one variant.
//!
//! Entry names are not guaranteed unique across configurations. The first match
//! in enumeration order wins, and the API server does not promise a stable order,
//! so callers must not rely on cross-configuration uniqueness.

use super::{AdmissionWebhookConfiguration, WebhookEntry, WebhookEntryMut};
use crate::error::TrustError;
use crate::store::ObjectReader;
use tracing::debug;

/// An owned copy of the configuration holding the entry, plus the entry's position
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookMatch<C> {
    pub configuration: C,
    pub index: usize,
}

impl<C: AdmissionWebhookConfiguration> WebhookMatch<C> {
    pub fn entry(&self) -> Option<WebhookEntry<'_>> {
        self.configuration.entries().get(self.index).copied()
    }

    pub fn entry_mut(&mut self) -> Option<WebhookEntryMut<'_>> {
        self.configuration.entry_mut(self.index)
    }

    pub fn into_configuration(self) -> C {
        self.configuration
    }
}

/// First entry named exactly `name`, searching configurations then entries in order
pub fn locate<C: AdmissionWebhookConfiguration>(
    configurations: &[C],
    name: &str,
) -> Option<WebhookMatch<C>> {
    configurations.iter().find_map(|configuration| {
        configuration
            .entries()
            .iter()
            .position(|entry| entry.name == name)
            .map(|index| WebhookMatch {
                configuration: configuration.clone(),
                index,
            })
    })
}

/// List every configuration of kind `C` and locate the entry named `name`
///
/// Fails with [`TrustError::NotFound`] when no configuration registers it. Not retried.
pub async fn find_webhook<C, S>(store: &S, name: &str) -> Result<WebhookMatch<C>, TrustError>
where
    C: AdmissionWebhookConfiguration,
    S: ObjectReader<C> + ?Sized,
{
    let configurations = store.list(None).await?;
    let found = locate(&configurations, name).ok_or_else(|| {
        TrustError::not_found(format!("{} webhook", C::kind(&())), name)
    })?;
    debug!(
        "Located webhook '{}' at index {} of {} '{}'",
        name,
        found.index,
        C::kind(&()),
        found.configuration.configuration_name()
    );
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::admissionregistration::v1::{
        MutatingWebhook, MutatingWebhookConfiguration,
    };
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    fn configuration(name: &str, entries: &[&str]) -> MutatingWebhookConfiguration {
        MutatingWebhookConfiguration {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            webhooks: Some(
                entries
                    .iter()
                    .map(|entry| MutatingWebhook {
                        name: (*entry).to_string(),
                        ..Default::default()
                    })
                    .collect(),
            ),
            ..Default::default()
        }
    }

    #[test]
    fn test_locate_in_second_configuration() {
        let configurations = vec![
            configuration("first", &["a", "b"]),
            configuration("second", &["c", "d", "x"]),
        ];

        let found = locate(&configurations, "x").unwrap();
        assert_eq!(found.configuration.configuration_name(), "second");
        assert_eq!(found.index, 2);
        assert_eq!(found.entry().map(|e| e.name), Some("x"));
    }

    #[test]
    fn test_locate_first_match_wins() {
        let configurations = vec![
            configuration("first", &["dup"]),
            configuration("second", &["dup"]),
        ];
        let found = locate(&configurations, "dup").unwrap();
        assert_eq!(found.configuration.configuration_name(), "first");
    }

    #[test]
    fn test_locate_is_case_sensitive() {
        let configurations = vec![configuration("first", &["Webhook"])];
        assert!(locate(&configurations, "webhook").is_none());
        assert!(locate(&configurations, "Web").is_none());
    }

    #[test]
    fn test_match_is_detached_from_collection() {
        let configurations = vec![configuration("first", &["a"])];
        let mut found = locate(&configurations, "a").unwrap();
        let entry = found.entry_mut().unwrap();
        entry.client_config.url = Some("https://example.invalid".to_string());

        assert!(configurations[0].entries()[0].client_config.url.is_none());
        assert_eq!(
            found.into_configuration().entries()[0]
                .client_config
                .url
                .as_deref(),
            Some("https://example.invalid")
        );
    }
}
