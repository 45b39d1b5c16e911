//! Platform selection for the sign-in bridge
//!
//! The host decides once, at startup, which handshake applies and hands the
//! matching collaborators in. Everything downstream only sees a
//! [`SignInFlow`].

pub mod diagnostics;
pub mod trigger;

use std::sync::Arc;

use butterfly_common::auth::{
    AuthError, BrowserSession, ButtonOptions, DocumentHost, GoogleEndpoints, IdentityScript,
    MountPoint, NativeRedirectFlow, ReadinessPolicy, ScriptGuard, SignInFlow, WebIdentityFlow,
};
use butterfly_domain::{AuthConfiguration, Platform};

pub use diagnostics::{ConfigDiagnostics, PlatformStatus};
pub use trigger::SignInTrigger;

/// Platform this binary was compiled for
///
/// iOS and Android targets run the native redirect flow; every other target
/// is treated as a browser host.
#[must_use]
pub const fn detect_platform() -> Platform {
    if cfg!(target_os = "ios") {
        Platform::Ios
    } else if cfg!(target_os = "android") {
        Platform::Android
    } else {
        Platform::Web
    }
}

/// Host-provided collaborators for the flows
#[derive(Clone, Default)]
pub struct FlowCollaborators {
    pub browser: Option<Arc<dyn BrowserSession>>,
    pub identity_script: Option<Arc<dyn IdentityScript>>,
    /// Page document to inject the identity script into
    pub document: Option<Arc<dyn DocumentHost>>,
    pub page_origin: Option<String>,
    pub mount_point: Option<MountPoint>,
    pub button: Option<ButtonOptions>,
    pub readiness: Option<ReadinessPolicy>,
    pub endpoints: Option<GoogleEndpoints>,
}

impl FlowCollaborators {
    #[must_use]
    pub fn with_browser(mut self, browser: Arc<dyn BrowserSession>) -> Self {
        self.browser = Some(browser);
        self
    }

    #[must_use]
    pub fn with_identity_script(mut self, script: Arc<dyn IdentityScript>) -> Self {
        self.identity_script = Some(script);
        self
    }

    #[must_use]
    pub fn with_document(mut self, document: Arc<dyn DocumentHost>) -> Self {
        self.document = Some(document);
        self
    }

    #[must_use]
    pub fn with_page_origin(mut self, origin: impl Into<String>) -> Self {
        self.page_origin = Some(origin.into());
        self
    }

    #[must_use]
    pub fn with_mount_point(mut self, mount_point: MountPoint) -> Self {
        self.mount_point = Some(mount_point);
        self
    }

    #[must_use]
    pub fn with_endpoints(mut self, endpoints: GoogleEndpoints) -> Self {
        self.endpoints = Some(endpoints);
        self
    }
}

/// Build the sign-in flow for `platform`
///
/// On the web, a provided document gets the identity script injected for as
/// long as the returned flow lives.
///
/// # Errors
/// Returns [`AuthError::ProviderUnavailable`] if the collaborator that
/// platform needs was not provided or the document rejects the script.
pub fn select_flow(
    platform: Platform,
    config: Arc<AuthConfiguration>,
    collaborators: FlowCollaborators,
) -> Result<Box<dyn SignInFlow>, AuthError> {
    tracing::debug!(%platform, "Selecting sign-in flow");

    if platform.is_native() {
        let browser = collaborators.browser.ok_or_else(|| {
            AuthError::ProviderUnavailable(format!("No browser session available on {platform}"))
        })?;
        let mut flow = NativeRedirectFlow::new(platform, config, browser);
        if let Some(endpoints) = collaborators.endpoints {
            flow = flow.with_endpoints(endpoints);
        }
        return Ok(Box::new(flow));
    }

    let script = collaborators.identity_script.ok_or_else(|| {
        AuthError::ProviderUnavailable("Google Sign-In not available".to_string())
    })?;
    let mut flow = WebIdentityFlow::new(config, script);
    if let Some(document) = collaborators.document {
        flow = flow.with_script_guard(ScriptGuard::acquire(document)?);
    }
    if let Some(origin) = collaborators.page_origin {
        flow = flow.with_page_origin(origin);
    }
    if let Some(mount_point) = collaborators.mount_point {
        flow = flow.with_mount_point(mount_point);
    }
    if let Some(button) = collaborators.button {
        flow = flow.with_button_options(button);
    }
    if let Some(readiness) = collaborators.readiness {
        flow = flow.with_readiness(readiness);
    }
    Ok(Box::new(flow))
}
