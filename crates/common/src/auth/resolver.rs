//! Client id and redirect target resolution
//!
//! Runs before any network interaction so a misconfigured platform fails
//! fast with [`AuthError::Configuration`].

use butterfly_domain::{AuthConfiguration, Platform};
use tracing::{debug, warn};

use super::error::AuthError;
use super::types::{RedirectTarget, ResolvedClient};

/// Scheme used when the app declares none
pub const FALLBACK_SCHEME: &str = "myapp";

/// Origin used on web when no page is available (server-side render)
pub const FALLBACK_WEB_ORIGIN: &str = "http://localhost:8081";

/// Resolve the client id and redirect target for `platform`
///
/// `page_origin` is the exact origin the page is served from; it is only
/// consulted on [`Platform::Web`] and is used verbatim because Google
/// validates redirects against the registered value byte for byte.
///
/// # Errors
/// Returns [`AuthError::Configuration`] when no client id is configured for
/// `platform`.
pub fn resolve_client(
    platform: Platform,
    config: &AuthConfiguration,
    page_origin: Option<&str>,
) -> Result<ResolvedClient, AuthError> {
    let client_id =
        config.client_id(platform).ok_or_else(|| AuthError::missing_client_id(platform))?;
    let redirect = redirect_target(platform, config, page_origin);

    debug!(%platform, client_id, redirect_uri = %redirect, "Resolved Google client");

    Ok(ResolvedClient { client_id: client_id.to_string(), redirect })
}

/// Redirect target for `platform`
///
/// Degrades to [`FALLBACK_SCHEME`] / [`FALLBACK_WEB_ORIGIN`] with a warning
/// when the scheme or origin is unknown.
#[must_use]
pub fn redirect_target(
    platform: Platform,
    config: &AuthConfiguration,
    page_origin: Option<&str>,
) -> RedirectTarget {
    match platform {
        Platform::Web => match page_origin.filter(|origin| !origin.is_empty()) {
            Some(origin) => RedirectTarget::origin(origin),
            None => {
                warn!(
                    fallback = FALLBACK_WEB_ORIGIN,
                    "No page origin available, using fallback redirect origin"
                );
                RedirectTarget::origin(FALLBACK_WEB_ORIGIN)
            }
        },
        Platform::Ios | Platform::Android => match config.scheme() {
            Some(scheme) => RedirectTarget::scheme(scheme),
            None => {
                warn!(
                    fallback = FALLBACK_SCHEME,
                    "App declares no URI scheme, using fallback redirect scheme"
                );
                RedirectTarget::scheme(FALLBACK_SCHEME)
            }
        },
    }
}
