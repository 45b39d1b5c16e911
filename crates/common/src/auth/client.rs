//! Google OAuth 2.0 HTTP client
//!
//! Handles the direct (non-browser) legs of the native handshake:
//! - Authorization URL building
//! - Authorization code exchange (with the PKCE verifier)
//! - Userinfo retrieval
//!
//! Each call is a single attempt; retries are the caller's decision.

use std::time::Duration;

use butterfly_domain::UserProfile;
use reqwest::{Client, Response};
use tracing::debug;

use super::error::AuthError;
use super::pkce::CHALLENGE_METHOD;
use super::types::{GoogleEndpoints, OAuthErrorResponse, PendingRequest, TokenResponse};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for Google's OAuth endpoints
#[derive(Debug, Clone)]
pub struct GoogleOAuthClient {
    endpoints: GoogleEndpoints,
    client: Client,
}

impl GoogleOAuthClient {
    /// Create a client for the given endpoints
    #[must_use]
    pub fn new(endpoints: GoogleEndpoints) -> Self {
        let client =
            Client::builder().timeout(REQUEST_TIMEOUT).build().unwrap_or_else(|_| Client::new());
        Self { endpoints, client }
    }

    #[must_use]
    pub fn endpoints(&self) -> &GoogleEndpoints {
        &self.endpoints
    }

    /// Build the authorization URL for `request`
    ///
    /// Carries `response_type=code`, the S256 challenge, `state` and
    /// `access_type=offline` so Google issues a refresh token.
    #[must_use]
    pub fn authorization_url(&self, request: &PendingRequest) -> String {
        let mut params = vec![
            ("client_id", request.client_id.clone()),
            ("redirect_uri", request.redirect.as_str().to_string()),
            ("response_type", "code".to_string()),
            ("scope", request.scope_string()),
        ];

        if let Some(pkce) = &request.pkce {
            params.push(("state", pkce.state.clone()));
            params.push(("code_challenge", pkce.code_challenge.clone()));
            params.push(("code_challenge_method", CHALLENGE_METHOD.to_string()));
        }

        params.push(("access_type", "offline".to_string()));

        let query_string = params
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{}", self.endpoints.authorization, query_string)
    }

    /// Exchange an authorization code for tokens
    ///
    /// Sends the verifier generated for `request`; `client_secret` is
    /// included only when configured.
    ///
    /// # Errors
    /// Returns [`AuthError::Configuration`] if `request` has no PKCE
    /// material, [`AuthError::Network`] if Google cannot be reached and
    /// [`AuthError::Provider`] if the token endpoint rejects the exchange.
    pub async fn exchange_code(
        &self,
        request: &PendingRequest,
        code: &str,
        client_secret: Option<&str>,
    ) -> Result<TokenResponse, AuthError> {
        let pkce = request.pkce.as_ref().ok_or_else(|| {
            AuthError::Configuration("Authorization request has no PKCE verifier".to_string())
        })?;

        let mut form = vec![
            ("grant_type", "authorization_code"),
            ("client_id", request.client_id.as_str()),
            ("code", code),
            ("redirect_uri", request.redirect.as_str()),
            ("code_verifier", pkce.code_verifier.as_str()),
        ];
        if let Some(secret) = client_secret {
            form.push(("client_secret", secret));
        }

        debug!(token_endpoint = %self.endpoints.token, "Exchanging authorization code");
        let response = self.client.post(&self.endpoints.token).form(&form).send().await?;
        let response = ensure_success(response, "Token exchange failed").await?;

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| AuthError::Provider(format!("Invalid token response: {e}")))
    }

    /// Fetch the signed-in user's profile
    ///
    /// # Errors
    /// Returns [`AuthError::Network`] if Google cannot be reached and
    /// [`AuthError::Provider`] if the request is rejected or the body is not
    /// a profile.
    pub async fn fetch_user_profile(&self, access_token: &str) -> Result<UserProfile, AuthError> {
        debug!(userinfo_endpoint = %self.endpoints.userinfo, "Fetching user profile");
        let response = self
            .client
            .get(&self.endpoints.userinfo)
            .query(&[("access_token", access_token)])
            .send()
            .await?;
        let response = ensure_success(response, "User info request failed").await?;

        response
            .json::<UserProfile>()
            .await
            .map_err(|e| AuthError::Provider(format!("Invalid user info response: {e}")))
    }
}

impl Default for GoogleOAuthClient {
    fn default() -> Self {
        Self::new(GoogleEndpoints::default())
    }
}

async fn ensure_success(response: Response, context: &str) -> Result<Response, AuthError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match response.json::<OAuthErrorResponse>().await {
        Ok(error) => Err(AuthError::from_oauth_response(context, &error)),
        Err(_) => Err(AuthError::Provider(format!("{context}: HTTP {status}"))),
    }
}
