//! Google sign-in configuration structures
//!
//! Loading these values (environment, app manifest) is the job of
//! `butterfly-infra`; this module only defines their shape and the
//! per-platform selection rule.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Platform;

/// OAuth client identifiers registered per platform with Google
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientIds {
    pub ios: Option<String>,
    pub android: Option<String>,
    pub web: Option<String>,
}

impl ClientIds {
    /// Client id registered for `platform`
    ///
    /// Blank values are treated as absent.
    #[must_use]
    pub fn for_platform(&self, platform: Platform) -> Option<&str> {
        let value = match platform {
            Platform::Ios => self.ios.as_deref(),
            Platform::Android => self.android.as_deref(),
            Platform::Web => self.web.as_deref(),
        };
        value.map(str::trim).filter(|id| !id.is_empty())
    }

    /// Set the client id for `platform`
    pub fn set(&mut self, platform: Platform, client_id: impl Into<String>) {
        let slot = match platform {
            Platform::Ios => &mut self.ios,
            Platform::Android => &mut self.android,
            Platform::Web => &mut self.web,
        };
        *slot = Some(client_id.into());
    }
}

/// Everything the sign-in bridge needs from configuration
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfiguration {
    pub client_ids: ClientIds,

    /// Secret sent with the code exchange when Google requires one
    pub client_secret: Option<String>,

    /// URI scheme the application registered for deep links
    pub scheme: Option<String>,
}

impl AuthConfiguration {
    /// Client id for `platform`, if configured
    #[must_use]
    pub fn client_id(&self, platform: Platform) -> Option<&str> {
        self.client_ids.for_platform(platform)
    }

    /// Client secret, if configured and non-blank
    #[must_use]
    pub fn client_secret(&self) -> Option<&str> {
        self.client_secret.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Declared URI scheme, if configured and non-blank
    #[must_use]
    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

impl fmt::Debug for AuthConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfiguration")
            .field("client_ids", &self.client_ids)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .field("scheme", &self.scheme)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_id_selected_per_platform() {
        let config = AuthConfiguration {
            client_ids: ClientIds {
                ios: Some("ios-id".to_string()),
                android: None,
                web: Some("web-id".to_string()),
            },
            ..AuthConfiguration::default()
        };

        assert_eq!(config.client_id(Platform::Ios), Some("ios-id"));
        assert_eq!(config.client_id(Platform::Android), None);
        assert_eq!(config.client_id(Platform::Web), Some("web-id"));
    }

    #[test]
    fn test_blank_values_are_absent() {
        let mut config = AuthConfiguration::default();
        config.client_ids.set(Platform::Android, "   ");
        config.client_secret = Some(String::new());
        config.scheme = Some(" ".to_string());

        assert_eq!(config.client_id(Platform::Android), None);
        assert_eq!(config.client_secret(), None);
        assert_eq!(config.scheme(), None);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = AuthConfiguration {
            client_secret: Some("super-secret".to_string()),
            ..AuthConfiguration::default()
        };

        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
