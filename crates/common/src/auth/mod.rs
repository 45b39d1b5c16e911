//! Google sign-in bridge
//!
//! Resolves the running platform and configuration into a Google client,
//! drives the platform-appropriate handshake and normalizes the outcome into
//! a single [`AuthResult`](butterfly_domain::AuthResult).
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │    SignInFlow    │  one capability: sign_in() -> AuthResult
//! └────────┬─────────┘
//!          │
//!          ├──► NativeRedirectFlow   (iOS / Android)
//!          │         ├──► resolver            client id + <scheme>://
//!          │         ├──► pkce                fresh S256 pair per attempt
//!          │         ├──► BrowserSession      host-provided auth session
//!          │         └──► GoogleOAuthClient   code exchange + userinfo
//!          │
//!          └──► WebIdentityFlow      (browser)
//!                    ├──► resolver            client id + page origin
//!                    ├──► IdentityScript      google.accounts.id
//!                    └──► credential          identity token payload decode
//! ```
//!
//! # Usage Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use butterfly_common::auth::{NativeRedirectFlow, SignInFlow};
//! use butterfly_common::testing::MockBrowserSession;
//! use butterfly_domain::{AuthConfiguration, ClientIds, Platform};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AuthConfiguration {
//!     client_ids: ClientIds {
//!         ios: Some("abc.apps.googleusercontent.com".to_string()),
//!         ..ClientIds::default()
//!     },
//!     client_secret: None,
//!     scheme: Some("butterfly".to_string()),
//! };
//!
//! let flow = NativeRedirectFlow::new(
//!     Platform::Ios,
//!     Arc::new(config),
//!     Arc::new(MockBrowserSession::approving("code")),
//! );
//! let result = flow.sign_in().await?;
//! println!("Welcome {}", result.user.name.unwrap_or_default());
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - **[`types`]**: pending request, endpoints, wire and collaborator payloads
//! - **[`resolver`]**: client id / redirect target selection
//! - **[`pkce`]**: PKCE challenge generation and state validation
//! - **[`client`]**: Google token and userinfo HTTP client
//! - **[`native`]**: native redirect handshake
//! - **[`web`]**: web identity-callback handshake
//! - **[`credential`]**: identity token payload decoding
//! - **[`script`]**: scoped identity script injection

pub mod client;
pub mod credential;
pub mod error;
pub mod native;
pub mod pkce;
pub mod resolver;
pub mod script;
pub mod traits;
pub mod types;
pub mod web;

// Re-export commonly used types and functions
pub use client::GoogleOAuthClient;
pub use credential::{decode_identity_token, IdTokenClaims};
pub use error::AuthError;
pub use native::{authorization_code_from_callback, NativeRedirectFlow};
pub use pkce::{generate_code_challenge, generate_code_verifier, PkceChallenge};
pub use resolver::{redirect_target, resolve_client, FALLBACK_SCHEME, FALLBACK_WEB_ORIGIN};
pub use script::{ScriptGuard, GOOGLE_IDENTITY_SCRIPT_SRC};
pub use traits::{BrowserSession, DocumentHost, IdentityScript, SignInFlow};
pub use types::{
    BrowserOutcome, ButtonOptions, CredentialCallback, CredentialResponse, GoogleEndpoints,
    IdConfiguration, MountPoint, PendingRequest, RedirectTarget, ResolvedClient, TokenResponse,
};
pub use web::{credential_to_result, ReadinessPolicy, WebIdentityFlow};
