//! Identity token payload decoding
//!
//! Google's web identity script delivers a compact signed token
//! (`header.payload.signature`, each segment base64url). Only the payload is
//! decoded here.
//!
//! # Trust boundary
//!
//! The signature is **not** verified locally. Claims decoded by this module
//! are fit for display only; anything making authorization decisions must
//! verify the token server-side against Google's published keys.

use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use butterfly_domain::UserProfile;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::error::AuthError;

/// Claims carried by a Google identity token payload
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IdTokenClaims {
    pub sub: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub email_verified: Option<bool>,
    /// Expiry as seconds since the Unix epoch
    #[serde(default)]
    pub exp: Option<i64>,
}

impl IdTokenClaims {
    /// Expiry of the token, if the payload carries a valid `exp`
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }

    /// User identity described by these claims
    #[must_use]
    pub fn user_profile(&self) -> UserProfile {
        UserProfile {
            id: self.sub.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            picture: self.picture.clone(),
        }
    }
}

/// Decode the payload segment of a compact identity token
///
/// # Errors
/// Returns [`AuthError::Decode`] if the token does not have three segments,
/// the payload is not base64, or the decoded bytes are not a JSON claims
/// object with a `sub`.
pub fn decode_identity_token(token: &str) -> Result<IdTokenClaims, AuthError> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    let [_, payload, _] = segments.as_slice() else {
        return Err(AuthError::Decode(format!(
            "expected 3 token segments, found {}",
            segments.len()
        )));
    };

    let bytes = decode_segment(payload)?;
    serde_json::from_slice(&bytes)
        .map_err(|e| AuthError::Decode(format!("invalid token payload: {e}")))
}

/// Accepts the URL-safe alphabet tokens use, and the standard alphabet, with
/// or without padding
fn decode_segment(segment: &str) -> Result<Vec<u8>, AuthError> {
    if segment.is_empty() {
        return Err(AuthError::Decode("empty token payload".to_string()));
    }

    let unpadded = segment.trim_end_matches('=');
    URL_SAFE_NO_PAD
        .decode(unpadded)
        .or_else(|_| STANDARD_NO_PAD.decode(unpadded))
        .map_err(|e| AuthError::Decode(format!("payload is not base64: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_with_payload(payload: &str) -> String {
        format!(
            "{}.{}.{}",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload),
            URL_SAFE_NO_PAD.encode("signature")
        )
    }

    #[test]
    fn test_decodes_profile_claims() {
        let token = token_with_payload(
            r#"{"sub":"123","name":"Ana","email":"a@x.com","picture":"http://img.example/a.png","exp":1700000000}"#,
        );

        let claims = decode_identity_token(&token).expect("decode");
        let user = claims.user_profile();

        assert_eq!(
            user,
            UserProfile {
                id: "123".to_string(),
                name: Some("Ana".to_string()),
                email: Some("a@x.com".to_string()),
                picture: Some("http://img.example/a.png".to_string()),
            }
        );
        assert_eq!(claims.expires_at().map(|t| t.timestamp()), Some(1_700_000_000));
    }

    #[test]
    fn test_accepts_padded_standard_alphabet() {
        let payload = STANDARD_NO_PAD.encode(r#"{"sub":"??>"}"#);
        let token = format!("h.{payload}==.s");
        assert_eq!(decode_identity_token(&token).expect("decode").sub, "??>");
    }

    #[test]
    fn test_rejects_wrong_segment_count() {
        for token in ["", "onlyone", "two.parts", "a.b.c.d"] {
            assert!(matches!(decode_identity_token(token), Err(AuthError::Decode(_))), "{token}");
        }
    }

    #[test]
    fn test_rejects_invalid_base64() {
        let err = decode_identity_token("header.!!!not-base64!!!.sig").expect_err("fail");
        assert!(matches!(err, AuthError::Decode(_)));
    }

    #[test]
    fn test_rejects_invalid_json() {
        let token = token_with_payload("not json at all");
        assert!(matches!(decode_identity_token(&token), Err(AuthError::Decode(_))));
    }

    #[test]
    fn test_rejects_payload_without_subject() {
        let token = token_with_payload(r#"{"name":"Ana"}"#);
        assert!(matches!(decode_identity_token(&token), Err(AuthError::Decode(_))));
    }

    #[test]
    fn test_rejects_empty_payload() {
        assert!(matches!(decode_identity_token("a..c"), Err(AuthError::Decode(_))));
    }
}
