//! Core sign-in domain types
//!
//! Defines the runtime platform tag and the normalized result every sign-in
//! path hands back to the UI, regardless of which handshake produced it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ButterflyError;

/// Runtime platform the application is executing on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Native iOS build
    Ios,
    /// Native Android build
    Android,
    /// Browser build served from a web origin
    Web,
}

impl Platform {
    /// All supported platforms, in configuration order
    pub const ALL: [Self; 3] = [Self::Ios, Self::Android, Self::Web];

    /// Lowercase tag used in configuration and logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Android => "android",
            Self::Web => "web",
        }
    }

    /// Whether this platform signs in through the native redirect handshake
    #[must_use]
    pub const fn is_native(self) -> bool {
        matches!(self, Self::Ios | Self::Android)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ButterflyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ios" => Ok(Self::Ios),
            "android" => Ok(Self::Android),
            "web" => Ok(Self::Web),
            other => Err(ButterflyError::InvalidInput(format!("Unknown platform: {other}"))),
        }
    }
}

/// Identity of the signed-in Google account
///
/// The userinfo endpoint reports the subject as `id`, identity tokens carry
/// it as `sub`; both deserialize into [`UserProfile::id`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Stable Google subject identifier
    #[serde(alias = "sub")]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Profile picture URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

/// Normalized success payload of a sign-in attempt
///
/// Only ever built from a verified successful completion. The web path
/// carries the raw identity token as `access_token` and never has a refresh
/// token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResult {
    pub access_token: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Absolute expiry of `access_token`, when the provider reported one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,

    /// Platform whose handshake produced this result
    pub platform: Platform,

    pub user: UserProfile,
}

impl AuthResult {
    /// Whether the access token has expired (tokens without expiry never do)
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|expires_at| Utc::now() >= expires_at)
    }
}
