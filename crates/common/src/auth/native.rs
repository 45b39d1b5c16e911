//! Native (iOS / Android) authorization-code handshake
//!
//! `Idle → RequestBuilt → BrowserOpened → AwaitingCallback → CodeReceived →
//! TokenExchanged → Success`, or `Cancelled` / `Failed` from any state.
//!
//! The browser session is provided by the host app; the code exchange and
//! userinfo fetch go straight to Google over HTTPS.

use std::sync::Arc;

use async_trait::async_trait;
use butterfly_domain::{AuthConfiguration, AuthResult, Platform};
use chrono::{Duration, Utc};
use tracing::{debug, info, warn};
use url::Url;

use super::client::GoogleOAuthClient;
use super::error::AuthError;
use super::pkce::validate_state;
use super::resolver::resolve_client;
use super::traits::{BrowserSession, SignInFlow};
use super::types::{BrowserOutcome, GoogleEndpoints, PendingRequest};

/// Redirect-based Google sign-in for native builds
pub struct NativeRedirectFlow {
    platform: Platform,
    config: Arc<AuthConfiguration>,
    browser: Arc<dyn BrowserSession>,
    client: GoogleOAuthClient,
}

impl NativeRedirectFlow {
    /// Create a flow talking to Google's production endpoints
    #[must_use]
    pub fn new(
        platform: Platform,
        config: Arc<AuthConfiguration>,
        browser: Arc<dyn BrowserSession>,
    ) -> Self {
        Self { platform, config, browser, client: GoogleOAuthClient::default() }
    }

    /// Use different OAuth endpoints
    #[must_use]
    pub fn with_endpoints(mut self, endpoints: GoogleEndpoints) -> Self {
        self.client = GoogleOAuthClient::new(endpoints);
        self
    }

    /// Build a fresh pending request (new PKCE pair every call)
    ///
    /// # Errors
    /// Returns [`AuthError::Configuration`] if the platform has no client id.
    pub fn build_request(&self) -> Result<PendingRequest, AuthError> {
        let client = resolve_client(self.platform, &self.config, None)?;
        Ok(PendingRequest::authorization_code(client))
    }

    /// Authorization URL for `request`
    #[must_use]
    pub fn authorization_url(&self, request: &PendingRequest) -> String {
        self.client.authorization_url(request)
    }

    /// Complete `request` from the browser session's outcome
    ///
    /// # Errors
    /// See [`SignInFlow::sign_in`].
    pub async fn complete(
        &self,
        request: &PendingRequest,
        outcome: BrowserOutcome,
    ) -> Result<AuthResult, AuthError> {
        let callback_url = match outcome {
            BrowserOutcome::Success { callback_url } => callback_url,
            BrowserOutcome::Cancel => {
                info!(platform = %self.platform, "Google sign-in cancelled by user");
                return Err(AuthError::Cancelled);
            }
            BrowserOutcome::Dismiss => {
                warn!(platform = %self.platform, "Browser session dismissed");
                return Err(AuthError::authentication_failed());
            }
            BrowserOutcome::Error { message } => {
                warn!(platform = %self.platform, %message, "Browser session failed");
                return Err(AuthError::authentication_failed());
            }
        };

        let code = authorization_code_from_callback(request, &callback_url)?;
        debug!("Authorization code received");

        let tokens =
            self.client.exchange_code(request, &code, self.config.client_secret()).await?;
        debug!("Authorization code exchanged");

        let user = self.client.fetch_user_profile(&tokens.access_token).await?;
        let expires_at = tokens
            .expires_in
            .filter(|secs| *secs > 0)
            .and_then(Duration::try_seconds)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime));

        info!(platform = %self.platform, user_id = %user.id, "Google sign-in succeeded");

        Ok(AuthResult {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_at,
            platform: self.platform,
            user,
        })
    }
}

#[async_trait]
impl SignInFlow for NativeRedirectFlow {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn sign_in(&self) -> Result<AuthResult, AuthError> {
        let request = self.build_request()?;
        let auth_url = self.authorization_url(&request);

        info!(platform = %self.platform, "Opening Google sign-in session");
        let outcome = self.browser.open(&auth_url, request.redirect.as_str()).await?;

        self.complete(&request, outcome).await
    }
}

/// Extract the authorization code from the redirect Google sent back
///
/// # Errors
/// Returns [`AuthError::Provider`] if the callback is unparsable, carries an
/// OAuth `error`, has a mismatched `state`, or has no `code`.
pub fn authorization_code_from_callback(
    request: &PendingRequest,
    callback_url: &str,
) -> Result<String, AuthError> {
    let url = Url::parse(callback_url)
        .map_err(|e| AuthError::Provider(format!("Invalid redirect URL: {e}")))?;

    let mut code = None;
    let mut state = None;
    let mut error = None;
    let mut error_description = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            "error_description" => error_description = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(error) = error {
        return Err(AuthError::Provider(match error_description {
            Some(description) => format!("Authorization failed: {error}: {description}"),
            None => format!("Authorization failed: {error}"),
        }));
    }

    if let Some(pkce) = &request.pkce {
        let received = state.unwrap_or_default();
        if !validate_state(&pkce.state, &received) {
            return Err(AuthError::Provider("State mismatch in authorization response".into()));
        }
    }

    code.filter(|c| !c.is_empty())
        .ok_or_else(|| AuthError::Provider("Authorization response has no code".to_string()))
}

#[cfg(test)]
mod tests {
    use butterfly_domain::ClientIds;

    use super::*;
    use crate::testing::MockBrowserSession;

    fn config() -> Arc<AuthConfiguration> {
        Arc::new(AuthConfiguration {
            client_ids: ClientIds {
                ios: Some("abc.apps.googleusercontent.com".to_string()),
                android: None,
                web: None,
            },
            client_secret: None,
            scheme: Some("butterfly".to_string()),
        })
    }

    fn flow(browser: MockBrowserSession) -> NativeRedirectFlow {
        NativeRedirectFlow::new(Platform::Ios, config(), Arc::new(browser))
    }

    #[test]
    fn test_fresh_verifier_per_request() {
        let flow = flow(MockBrowserSession::cancelling());
        let first = flow.build_request().expect("first");
        let second = flow.build_request().expect("second");

        let first = first.pkce.expect("pkce");
        let second = second.pkce.expect("pkce");
        assert_ne!(first.code_verifier, second.code_verifier);
        assert_ne!(first.state, second.state);
    }

    #[tokio::test]
    async fn test_missing_client_id_never_opens_browser() {
        let browser = MockBrowserSession::cancelling();
        let flow = NativeRedirectFlow::new(Platform::Android, config(), Arc::new(browser.clone()));

        let err = flow.sign_in().await.expect_err("no android id");
        assert!(matches!(err, AuthError::Configuration(_)));
        assert!(browser.opened_urls().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_outcome() {
        let browser = MockBrowserSession::cancelling();
        let err = flow(browser.clone()).sign_in().await.expect_err("cancelled");

        assert!(err.is_cancelled());
        assert_eq!(browser.opened_urls().len(), 1);
    }

    #[tokio::test]
    async fn test_dismiss_and_error_are_generic_failures() {
        for outcome in
            [BrowserOutcome::Dismiss, BrowserOutcome::Error { message: "boom".to_string() }]
        {
            let err = flow(MockBrowserSession::with_outcome(outcome))
                .sign_in()
                .await
                .expect_err("failure");
            assert_eq!(err.to_string(), "Authentication failed");
        }
    }

    #[test]
    fn test_callback_parsing() {
        let flow = flow(MockBrowserSession::cancelling());
        let request = flow.build_request().expect("request");
        let state = request.pkce.as_ref().expect("pkce").state.clone();

        let code = authorization_code_from_callback(
            &request,
            &format!("butterfly://?code=4%2F0Ab&state={state}"),
        )
        .expect("code");
        assert_eq!(code, "4/0Ab");

        let err = authorization_code_from_callback(&request, "butterfly://?code=x&state=forged")
            .expect_err("state");
        assert!(err.to_string().contains("State mismatch"));

        let err = authorization_code_from_callback(
            &request,
            "butterfly://?error=access_denied&error_description=User%20denied",
        )
        .expect_err("error");
        assert_eq!(err.to_string(), "Authorization failed: access_denied: User denied");

        let err = authorization_code_from_callback(&request, &format!("butterfly://?state={state}"))
            .expect_err("no code");
        assert!(matches!(err, AuthError::Provider(_)));

        assert!(authorization_code_from_callback(&request, "not a url").is_err());
    }
}
