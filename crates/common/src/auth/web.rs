//! Web identity-callback handshake
//!
//! `ScriptLoading → ScriptReady → Initialized → PromptOrButtonRendered →
//! CallbackReceived → Decoded → Success`, or `Failed` at any point.
//!
//! Waiting for the identity script is bounded: if it is not ready within
//! [`ReadinessPolicy::timeout`] the attempt fails with
//! [`AuthError::ProviderUnavailable`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use butterfly_domain::{AuthConfiguration, AuthResult, Platform};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::credential::decode_identity_token;
use super::error::AuthError;
use super::resolver::resolve_client;
use super::script::ScriptGuard;
use super::traits::{IdentityScript, SignInFlow};
use super::types::{ButtonOptions, CredentialResponse, IdConfiguration, MountPoint};

/// How long and how often to poll for the identity script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self { interval: Duration::from_millis(100), timeout: Duration::from_secs(10) }
    }
}

/// Google sign-in through the page's identity script
pub struct WebIdentityFlow {
    config: Arc<AuthConfiguration>,
    script: Arc<dyn IdentityScript>,
    page_origin: Option<String>,
    mount_point: Option<MountPoint>,
    button: ButtonOptions,
    readiness: ReadinessPolicy,
    script_tag: Option<ScriptGuard>,
}

impl WebIdentityFlow {
    /// Create a flow driving `script` with the default button and readiness
    /// policy
    #[must_use]
    pub fn new(config: Arc<AuthConfiguration>, script: Arc<dyn IdentityScript>) -> Self {
        Self {
            config,
            script,
            page_origin: None,
            mount_point: None,
            button: ButtonOptions::default(),
            readiness: ReadinessPolicy::default(),
            script_tag: None,
        }
    }

    /// Keep the injected identity script alive as long as this flow
    ///
    /// The tag is removed when the flow is dropped, if `guard` inserted it.
    #[must_use]
    pub fn with_script_guard(mut self, guard: ScriptGuard) -> Self {
        self.script_tag = Some(guard);
        self
    }

    /// Origin the page is served from
    #[must_use]
    pub fn with_page_origin(mut self, origin: impl Into<String>) -> Self {
        self.page_origin = Some(origin.into());
        self
    }

    /// Element to render the provider button into
    #[must_use]
    pub fn with_mount_point(mut self, mount_point: MountPoint) -> Self {
        self.mount_point = Some(mount_point);
        self
    }

    #[must_use]
    pub fn with_button_options(mut self, button: ButtonOptions) -> Self {
        self.button = button;
        self
    }

    #[must_use]
    pub fn with_readiness(mut self, readiness: ReadinessPolicy) -> Self {
        self.readiness = readiness;
        self
    }

    /// Wait until the identity script is ready
    ///
    /// # Errors
    /// Returns [`AuthError::ProviderUnavailable`] once the readiness timeout
    /// elapses.
    pub async fn wait_for_script(&self) -> Result<(), AuthError> {
        let script = Arc::clone(&self.script);
        let interval = self.readiness.interval;

        let ready = tokio::time::timeout(self.readiness.timeout, async move {
            while !script.is_ready() {
                debug!("Waiting for Google identity script to load");
                tokio::time::sleep(interval).await;
            }
        })
        .await;

        ready.map_err(|_| {
            warn!(timeout = ?self.readiness.timeout, "Google identity script never became ready");
            AuthError::ProviderUnavailable(format!(
                "Google Sign-In script did not load within {:?}",
                self.readiness.timeout
            ))
        })
    }

    /// Manual trigger: open the one-tap prompt
    ///
    /// The credential it yields is delivered to the callback registered by an
    /// outstanding [`SignInFlow::sign_in`].
    ///
    /// # Errors
    /// Returns [`AuthError::ProviderUnavailable`] if the script is not loaded.
    pub fn prompt(&self) -> Result<(), AuthError> {
        if !self.script.is_ready() {
            return Err(AuthError::ProviderUnavailable("Google Sign-In not available".to_string()));
        }
        self.script.prompt()
    }
}

#[async_trait]
impl SignInFlow for WebIdentityFlow {
    fn platform(&self) -> Platform {
        Platform::Web
    }

    async fn sign_in(&self) -> Result<AuthResult, AuthError> {
        let client = resolve_client(Platform::Web, &self.config, self.page_origin.as_deref())?;

        self.wait_for_script().await?;
        info!(origin = %client.redirect, "Initializing Google identity client");

        let (tx, mut rx) = mpsc::unbounded_channel::<CredentialResponse>();
        self.script.initialize(
            IdConfiguration::new(client.client_id),
            Box::new(move |response| {
                // Receiver is gone once this attempt resolved; later credentials are ignored.
                let _ = tx.send(response);
            }),
        )?;

        if let Some(mount_point) = &self.mount_point {
            self.script.render_button(mount_point, &self.button)?;
        }

        let Some(response) = rx.recv().await else {
            info!("Identity client released the callback without a credential");
            return Err(AuthError::Cancelled);
        };

        credential_to_result(&response)
    }
}

/// Normalize a delivered credential into an [`AuthResult`]
///
/// # Errors
/// Returns [`AuthError::Decode`] if the credential payload is malformed.
pub fn credential_to_result(response: &CredentialResponse) -> Result<AuthResult, AuthError> {
    let claims = decode_identity_token(&response.credential).inspect_err(|e| {
        warn!(error = %e, "Error processing Google sign-in credential");
    })?;

    info!(user_id = %claims.sub, "Google sign-in succeeded");

    Ok(AuthResult {
        access_token: response.credential.clone(),
        refresh_token: None,
        expires_at: claims.expires_at(),
        platform: Platform::Web,
        user: claims.user_profile(),
    })
}

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use butterfly_domain::ClientIds;

    use super::*;
    use crate::auth::script::GOOGLE_IDENTITY_SCRIPT_SRC;
    use crate::auth::traits::DocumentHost;
    use crate::testing::{MockDocumentHost, MockIdentityScript};

    fn config() -> Arc<AuthConfiguration> {
        Arc::new(AuthConfiguration {
            client_ids: ClientIds {
                web: Some("web.apps.googleusercontent.com".into()),
                ..ClientIds::default()
            },
            ..AuthConfiguration::default()
        })
    }

    fn credential(payload: &str) -> String {
        format!("eyJhbGciOiJSUzI1NiJ9.{}.c2ln", URL_SAFE_NO_PAD.encode(payload))
    }

    fn fast() -> ReadinessPolicy {
        ReadinessPolicy { interval: Duration::from_millis(5), timeout: Duration::from_millis(200) }
    }

    #[tokio::test]
    async fn test_sign_in_with_delivered_credential() {
        let token =
            credential(r#"{"sub":"123","name":"Ana","email":"a@x.com","picture":"http://p"}"#);
        let script = MockIdentityScript::ready().respond_on_initialize(&token);
        let flow = WebIdentityFlow::new(config(), Arc::new(script.clone()))
            .with_mount_point(MountPoint("google-button".to_string()));

        let result = flow.sign_in().await.expect("sign in");

        assert_eq!(result.access_token, token);
        assert!(result.refresh_token.is_none());
        assert_eq!(result.user.id, "123");
        assert_eq!(result.platform, Platform::Web);

        let init = script.initialized_with().expect("initialized");
        assert_eq!(init.client_id, "web.apps.googleusercontent.com");
        assert!(!init.auto_select);
        assert!(init.cancel_on_tap_outside);
        assert_eq!(script.rendered_into(), vec![MountPoint("google-button".to_string())]);
    }

    #[tokio::test]
    async fn test_missing_web_client_id() {
        let script = MockIdentityScript::ready();
        let flow =
            WebIdentityFlow::new(Arc::new(AuthConfiguration::default()), Arc::new(script.clone()));

        assert!(matches!(flow.sign_in().await, Err(AuthError::Configuration(_))));
        assert!(script.initialized_with().is_none());
    }

    #[tokio::test]
    async fn test_script_never_ready_times_out() {
        let script = MockIdentityScript::never_ready();
        let flow = WebIdentityFlow::new(config(), Arc::new(script)).with_readiness(fast());

        let err = flow.sign_in().await.expect_err("timeout");
        assert!(matches!(err, AuthError::ProviderUnavailable(_)));
    }

    #[tokio::test]
    async fn test_script_ready_after_polls() {
        let token = credential(r#"{"sub":"42"}"#);
        let script = MockIdentityScript::ready_after(3).respond_on_initialize(&token);
        let flow = WebIdentityFlow::new(config(), Arc::new(script)).with_readiness(fast());

        assert_eq!(flow.sign_in().await.expect("sign in").user.id, "42");
    }

    #[tokio::test]
    async fn test_malformed_credential_is_decode_error() {
        let script =
            MockIdentityScript::ready().respond_on_initialize("not.a-valid-payload!.token");
        let flow = WebIdentityFlow::new(config(), Arc::new(script));

        assert!(matches!(flow.sign_in().await, Err(AuthError::Decode(_))));
    }

    #[tokio::test]
    async fn test_released_callback_is_cancellation() {
        let script = MockIdentityScript::ready().release_on_initialize();
        let flow = WebIdentityFlow::new(config(), Arc::new(script));

        assert!(matches!(flow.sign_in().await, Err(AuthError::Cancelled)));
    }

    #[test]
    fn test_prompt_requires_ready_script() {
        let flow = WebIdentityFlow::new(config(), Arc::new(MockIdentityScript::never_ready()));
        let err = flow.prompt().expect_err("unavailable");
        assert_eq!(err.to_string(), "Google Sign-In not available");

        let script = MockIdentityScript::ready();
        let flow = WebIdentityFlow::new(config(), Arc::new(script.clone()));
        flow.prompt().expect("prompt");
        assert_eq!(script.prompt_count(), 1);
    }

    #[test]
    fn test_script_tag_lives_as_long_as_flow() {
        let document = MockDocumentHost::new();
        let guard = ScriptGuard::acquire(Arc::new(document.clone())).expect("injected");

        let flow = WebIdentityFlow::new(config(), Arc::new(MockIdentityScript::ready()))
            .with_script_guard(guard);
        assert!(document.has_script(GOOGLE_IDENTITY_SCRIPT_SRC));

        drop(flow);
        assert!(!document.has_script(GOOGLE_IDENTITY_SCRIPT_SRC));
    }
}
