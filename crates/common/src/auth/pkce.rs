//! PKCE (Proof Key for Code Exchange) for the native redirect handshake
//!
//! Implements RFC 7636 with the S256 method. A new [`PkceChallenge`] is
//! generated for every sign-in attempt; verifiers are never reused.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Challenge method sent as `code_challenge_method`
pub const CHALLENGE_METHOD: &str = "S256";

/// Generate a cryptographically secure code verifier
///
/// 32 random bytes, URL-safe base64 without padding (43 characters, inside
/// the 43-128 range RFC 7636 requires).
#[must_use]
pub fn generate_code_verifier() -> String {
    random_token()
}

/// Derive the code challenge: `BASE64URL(SHA256(ASCII(code_verifier)))`
#[must_use]
pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Generate a random `state` value for CSRF protection
#[must_use]
pub fn generate_state() -> String {
    random_token()
}

/// Compare the state sent with the state received
///
/// Runs in time independent of where the first mismatch occurs.
#[must_use]
pub fn validate_state(expected: &str, actual: &str) -> bool {
    let (expected, actual) = (expected.as_bytes(), actual.as_bytes());
    if expected.len() != actual.len() {
        return false;
    }
    expected.iter().zip(actual).fold(0u8, |acc, (a, b)| acc | (a ^ b)) == 0
}

fn random_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// PKCE material for one authorization attempt
///
/// `code_verifier` stays local until the token exchange; `code_challenge`
/// and `state` travel in the authorization URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkceChallenge {
    pub code_verifier: String,
    pub code_challenge: String,
    pub state: String,
}

impl PkceChallenge {
    /// Generate a fresh verifier, its S256 challenge and a state token
    #[must_use]
    pub fn generate() -> Self {
        let code_verifier = generate_code_verifier();
        let code_challenge = generate_code_challenge(&code_verifier);
        Self { code_verifier, code_challenge, state: generate_state() }
    }

    /// Challenge method (always "S256")
    #[must_use]
    pub const fn challenge_method(&self) -> &'static str {
        CHALLENGE_METHOD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verifier_length_and_alphabet() {
        let challenge = PkceChallenge::generate();

        assert!(
            (43..=128).contains(&challenge.code_verifier.len()),
            "code_verifier has {} chars",
            challenge.code_verifier.len()
        );
        assert!(challenge
            .code_verifier
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert!(!challenge.code_challenge.contains('='));
        assert!(!challenge.state.is_empty());
    }

    #[test]
    fn test_unique_challenges() {
        let first = PkceChallenge::generate();
        let second = PkceChallenge::generate();

        assert_ne!(first.code_verifier, second.code_verifier);
        assert_ne!(first.code_challenge, second.code_challenge);
        assert_ne!(first.state, second.state);
    }

    #[test]
    fn test_rfc7636_appendix_b_vector() {
        let verifier = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";
        assert_eq!(
            generate_code_challenge(verifier),
            "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
        );
    }

    #[test]
    fn test_challenge_matches_verifier() {
        let challenge = PkceChallenge::generate();
        assert_eq!(challenge.code_challenge, generate_code_challenge(&challenge.code_verifier));
        assert_eq!(challenge.challenge_method(), "S256");
    }

    #[test]
    fn test_validate_state() {
        let state = generate_state();
        assert!(validate_state(&state, &state));
        assert!(!validate_state(&state, &generate_state()));
        assert!(!validate_state(&state, "short"));
        assert!(!validate_state("", "x"));
    }
}
