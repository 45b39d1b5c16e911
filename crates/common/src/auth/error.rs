//! Error type for the sign-in bridge
//!
//! Every failure path of a sign-in attempt resolves with exactly one of these
//! variants. Nothing is retried internally; [`ErrorClassification`] tells the
//! caller whether re-invoking is worthwhile.

use std::time::Duration;

use butterfly_domain::{ButterflyError, Platform};
use thiserror::Error;

use super::types::OAuthErrorResponse;
use crate::error::{ErrorClassification, ErrorSeverity};

/// Error type for sign-in operations
#[derive(Debug, Error)]
pub enum AuthError {
    /// No usable client configuration for the running platform
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// User dismissed the sign-in without completing it
    #[error("Authentication was cancelled")]
    Cancelled,

    /// Google reported a failure (authorization, token or userinfo endpoint)
    #[error("{0}")]
    Provider(String),

    /// Credential payload could not be decoded
    #[error("Failed to process Google sign-in: {0}")]
    Decode(String),

    /// Google identity script never became available
    #[error("{0}")]
    ProviderUnavailable(String),

    /// HTTP request to Google failed before a response was received
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl AuthError {
    /// Missing client id for `platform`
    #[must_use]
    pub fn missing_client_id(platform: Platform) -> Self {
        Self::Configuration(format!("Google Client ID not configured for platform '{platform}'"))
    }

    /// Generic failure used when the provider gives no detail
    #[must_use]
    pub fn authentication_failed() -> Self {
        Self::Provider("Authentication failed".to_string())
    }

    /// Wrap a structured OAuth error body returned by Google
    #[must_use]
    pub fn from_oauth_response(context: &str, response: &OAuthErrorResponse) -> Self {
        Self::Provider(format!("{context}: {response}"))
    }

    /// Whether the user chose to stop the attempt
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl ErrorClassification for AuthError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::ProviderUnavailable(_) | Self::Cancelled)
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Cancelled => ErrorSeverity::Info,
            Self::Network(_) | Self::ProviderUnavailable(_) => ErrorSeverity::Warning,
            Self::Provider(_) | Self::Decode(_) => ErrorSeverity::Error,
            Self::Configuration(_) => ErrorSeverity::Critical,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::ProviderUnavailable(_) => Some(Duration::from_secs(1)),
            _ => None,
        }
    }
}

impl From<AuthError> for ButterflyError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Configuration(msg) => Self::Config(msg),
            AuthError::Network(e) => Self::Network(e.to_string()),
            other => Self::Auth(other.to_string()),
        }
    }
}
