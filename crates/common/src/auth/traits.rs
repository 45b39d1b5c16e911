//! Traits for the sign-in bridge and its platform collaborators
//!
//! The bridge itself is one capability, [`SignInFlow`], with a native and a
//! web implementation. Everything the host platform provides (the
//! interactive browser session, Google's identity script, the page DOM) sits
//! behind a trait so flows can be driven by test doubles.

use async_trait::async_trait;
use butterfly_domain::{AuthResult, Platform};

use super::error::AuthError;
use super::types::{BrowserOutcome, ButtonOptions, CredentialCallback, IdConfiguration, MountPoint};

/// A platform-specific Google sign-in handshake
///
/// Each call is an independent attempt with its own pending request;
/// concurrent calls are not deduplicated.
#[async_trait]
pub trait SignInFlow: Send + Sync {
    /// Platform this flow serves
    fn platform(&self) -> Platform;

    /// Run one sign-in attempt to completion
    ///
    /// # Errors
    /// Returns the [`AuthError`] describing why no [`AuthResult`] was
    /// produced: configuration, cancellation, provider, decode or network
    /// failure.
    async fn sign_in(&self) -> Result<AuthResult, AuthError>;
}

/// Interactive browser session used by the native redirect handshake
///
/// Implemented by the host app (e.g. `ASWebAuthenticationSession`, Custom
/// Tabs). Suspends until the provider redirects to `return_url` or the user
/// dismisses the session.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Open `auth_url` and wait for the session to end
    ///
    /// # Errors
    /// Returns error if the session could not be started at all.
    async fn open(&self, auth_url: &str, return_url: &str) -> Result<BrowserOutcome, AuthError>;
}

/// Google's client-side identity object (`google.accounts.id`)
pub trait IdentityScript: Send + Sync {
    /// Whether the script has loaded and exposes the identity object
    fn is_ready(&self) -> bool;

    /// Initialize the identity client and register the credential callback
    ///
    /// # Errors
    /// Returns error if the identity object rejects the configuration.
    fn initialize(
        &self,
        config: IdConfiguration,
        callback: CredentialCallback,
    ) -> Result<(), AuthError>;

    /// Render the provider-drawn button into `mount`
    ///
    /// # Errors
    /// Returns error if the mount point does not exist.
    fn render_button(&self, mount: &MountPoint, options: &ButtonOptions) -> Result<(), AuthError>;

    /// Open the one-tap prompt
    ///
    /// # Errors
    /// Returns error if the prompt cannot be shown.
    fn prompt(&self) -> Result<(), AuthError>;
}

/// Minimal view of the page document for script tag management
pub trait DocumentHost: Send + Sync {
    /// Whether a `<script>` with this `src` is present
    fn has_script(&self, src: &str) -> bool;

    /// Append an async `<script>` tag with this `src`
    ///
    /// # Errors
    /// Returns error if the document rejects the element.
    fn append_script(&self, src: &str) -> Result<(), AuthError>;

    /// Remove the `<script>` tag with this `src`, if present
    fn remove_script(&self, src: &str);
}
