//! Configuration diagnostics
//!
//! A printable summary of what the sign-in bridge will use on this host.
//! Client ids are public identifiers and are shown; the client secret is
//! only ever reported as set or not set.

use std::fmt;

use butterfly_common::auth::redirect_target;
use butterfly_domain::{AuthConfiguration, Platform};
use serde::Serialize;

/// Configuration state of one platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformStatus {
    pub platform: Platform,
    pub client_id: Option<String>,
}

impl PlatformStatus {
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.client_id.is_some()
    }
}

/// Snapshot of the sign-in configuration for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigDiagnostics {
    /// Platform the host runs on
    pub platform: Platform,
    pub platforms: Vec<PlatformStatus>,
    pub client_secret_set: bool,
    pub scheme: Option<String>,
    /// Redirect the current platform would use
    pub redirect: String,
}

impl ConfigDiagnostics {
    #[must_use]
    pub fn collect(
        platform: Platform,
        config: &AuthConfiguration,
        page_origin: Option<&str>,
    ) -> Self {
        let platforms = Platform::ALL
            .into_iter()
            .map(|p| PlatformStatus {
                platform: p,
                client_id: config.client_id(p).map(str::to_string),
            })
            .collect();
        let redirect = redirect_target(platform, config, page_origin);

        Self {
            platform,
            platforms,
            client_secret_set: config.client_secret().is_some(),
            scheme: config.scheme().map(str::to_string),
            redirect: redirect.to_string(),
        }
    }

    /// Whether the current platform has a client id
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.platforms.iter().any(|s| s.platform == self.platform && s.is_configured())
    }
}

impl fmt::Display for ConfigDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Google sign-in configuration")?;
        writeln!(f, "  platform:      {}", self.platform)?;
        for status in &self.platforms {
            let value = status.client_id.as_deref().unwrap_or("not configured");
            writeln!(f, "  {:<14} {value}", format!("{} client:", status.platform))?;
        }
        writeln!(
            f,
            "  client secret: {}",
            if self.client_secret_set { "set" } else { "not set" }
        )?;
        writeln!(f, "  scheme:        {}", self.scheme.as_deref().unwrap_or("not declared"))?;
        write!(f, "  redirect:      {}", self.redirect)
    }
}
