//! Sign-in request, response and collaborator payload types
//!
//! Covers both handshakes: the OAuth 2.0 authorization-code exchange used on
//! native platforms and the identity-callback payloads exchanged with
//! Google's web identity script.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::pkce::PkceChallenge;

/// Scopes requested on every platform
pub const DEFAULT_SCOPES: [&str; 3] = ["openid", "profile", "email"];

/// Google OAuth 2.0 endpoints
///
/// Defaults point at Google; tests swap in a mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleEndpoints {
    pub authorization: String,
    pub token: String,
    pub userinfo: String,
}

impl GoogleEndpoints {
    /// Endpoints rooted at `base` (`{base}/o/oauth2/v2/auth`, `{base}/token`,
    /// `{base}/oauth2/v2/userinfo`)
    #[must_use]
    pub fn with_base_url(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            authorization: format!("{base}/o/oauth2/v2/auth"),
            token: format!("{base}/token"),
            userinfo: format!("{base}/oauth2/v2/userinfo"),
        }
    }
}

impl Default for GoogleEndpoints {
    fn default() -> Self {
        Self {
            authorization: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token: "https://oauth2.googleapis.com/token".to_string(),
            userinfo: "https://www.googleapis.com/oauth2/v2/userinfo".to_string(),
        }
    }
}

/// URI that returns control to the application after Google completes
///
/// Computed fresh for every attempt, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RedirectTarget(String);

impl RedirectTarget {
    /// Redirect back to a web page origin, used verbatim
    #[must_use]
    pub fn origin(origin: impl Into<String>) -> Self {
        Self(origin.into())
    }

    /// Redirect back into the native app through its URI scheme
    #[must_use]
    pub fn scheme(scheme: &str) -> Self {
        Self(format!("{scheme}://"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RedirectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Client id and redirect target chosen for the running platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedClient {
    pub client_id: String,
    pub redirect: RedirectTarget,
}

/// State of one in-flight authorization attempt
///
/// Owned by a single invocation and dropped when it resolves. `pkce` is
/// present only for the native redirect handshake.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub client_id: String,
    pub redirect: RedirectTarget,
    pub scopes: Vec<String>,
    pub pkce: Option<PkceChallenge>,
}

impl PendingRequest {
    /// Authorization-code request with a freshly generated PKCE pair
    #[must_use]
    pub fn authorization_code(client: ResolvedClient) -> Self {
        Self {
            client_id: client.client_id,
            redirect: client.redirect,
            scopes: default_scopes(),
            pkce: Some(PkceChallenge::generate()),
        }
    }

    /// Identity-callback request (no PKCE, the script owns the exchange)
    #[must_use]
    pub fn identity_callback(client: ResolvedClient) -> Self {
        Self {
            client_id: client.client_id,
            redirect: client.redirect,
            scopes: default_scopes(),
            pkce: None,
        }
    }

    /// Scopes as a space-separated string
    #[must_use]
    pub fn scope_string(&self) -> String {
        self.scopes.join(" ")
    }
}

fn default_scopes() -> Vec<String> {
    DEFAULT_SCOPES.iter().map(ToString::to_string).collect()
}

/// Token endpoint success body (RFC 6749 §5.1)
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub id_token: Option<String>,
    pub token_type: Option<String>,
    pub expires_in: Option<i64>,
    pub scope: Option<String>,
}

/// OAuth error body (RFC 6749 §5.2)
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthErrorResponse {
    pub error: String,
    pub error_description: Option<String>,
}

impl fmt::Display for OAuthErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_description {
            Some(desc) => write!(f, "{}: {}", self.error, desc),
            None => write!(f, "{}", self.error),
        }
    }
}

/// How an interactive browser session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserOutcome {
    /// Google redirected back to the redirect target
    Success { callback_url: String },
    /// User closed the session before completing
    Cancel,
    /// Session was dismissed by the system (e.g. app backgrounded)
    Dismiss,
    /// Session could not run
    Error { message: String },
}

/// Options passed to the identity script's `initialize`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdConfiguration {
    pub client_id: String,
    pub auto_select: bool,
    pub cancel_on_tap_outside: bool,
}

impl IdConfiguration {
    #[must_use]
    pub fn new(client_id: impl Into<String>) -> Self {
        Self { client_id: client_id.into(), auto_select: false, cancel_on_tap_outside: true }
    }
}

/// Options passed to the identity script's `renderButton`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonOptions {
    #[serde(rename = "type")]
    pub kind: String,
    pub theme: String,
    pub size: String,
    pub text: String,
    pub shape: String,
    pub logo_alignment: String,
}

impl Default for ButtonOptions {
    fn default() -> Self {
        Self {
            kind: "standard".to_string(),
            theme: "outline".to_string(),
            size: "large".to_string(),
            text: "continue_with".to_string(),
            shape: "rectangular".to_string(),
            logo_alignment: "left".to_string(),
        }
    }
}

/// Element the provider-drawn button is rendered into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPoint(pub String);

/// Payload the identity script hands to the credential callback
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CredentialResponse {
    /// Signed compact identity token
    pub credential: String,
    #[serde(default)]
    pub select_by: Option<String>,
}

impl CredentialResponse {
    #[must_use]
    pub fn new(credential: impl Into<String>) -> Self {
        Self { credential: credential.into(), select_by: None }
    }
}

/// Callback registered with the identity script
pub type CredentialCallback = Box<dyn Fn(CredentialResponse) + Send + Sync>;
